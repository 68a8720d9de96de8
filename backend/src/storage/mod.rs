//! # Storage Layer
//!
//! Persistence for the kennel: a SQLite database reached through `sqlx`, and
//! a blob store for images.
//!
//! ## Structure
//!
//! - `connection`: pool setup and schema
//! - `traits`: the storage interfaces the domain services use
//! - `repositories`: SQLite implementations, one per aggregate
//! - `images`: the image blob store
//! - `columns`: how dates, timestamps and enums are laid out in TEXT columns
//!
//! Every multi-row mutation (litter cascade, puppy batch, parent detach,
//! waitlist check-then-insert) runs inside a single SQLite transaction.

pub mod columns;
pub mod connection;
pub mod images;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use images::{FsImageStore, ImageStore};
pub use repositories::*;
pub use traits::*;
