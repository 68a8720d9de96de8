//! # IO Module
//!
//! The adapter layer between HTTP clients and the domain. Requests arrive as
//! the DTOs defined in the `shared` crate, are turned into domain commands,
//! and domain results are turned back into DTOs.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum
//! - **Serialization**: Serde JSON
//! - **State Management**: Axum `State` extractor over [`crate::AppState`]

pub mod rest;
