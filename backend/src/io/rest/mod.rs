//! # REST API Interface Layer
//!
//! HTTP endpoints for the kennel. This layer handles:
//! - JSON request/response serialization
//! - Translating domain errors into status codes and a uniform error body
//! - Admin authorization on mutating routes
//!
//! Routers are mounted under `/api` by [`crate::create_router`]:
//!
//! | Prefix            | Module              |
//! |-------------------|---------------------|
//! | `/api/litters`    | `litter_apis`, `puppy_apis` |
//! | `/api/grumble`    | `grumble_apis`      |
//! | `/api/waitlist`   | `waitlist_apis`     |
//! | `/api/settings`   | `settings_apis`     |
//!
//! Handlers contain no business logic; they map DTOs to commands, call a
//! service and map the result back.

pub mod auth;
pub mod error;
pub mod mappers;

pub mod grumble_apis;
pub mod litter_apis;
pub mod puppy_apis;
pub mod settings_apis;
pub mod waitlist_apis;
