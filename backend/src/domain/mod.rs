//! # Domain Module
//!
//! Business rules for the kennel: the litter/puppy aggregate and the
//! customer waitlist. Nothing here knows about HTTP; storage is reached only
//! through the traits in `crate::storage`.
//!
//! ## Module Organization
//!
//! - **models**: validated domain types (dates, enums, normalized phone numbers)
//! - **puppy_status**: the Available / Reserved / Sold lifecycle
//! - **litter_classification**: current vs. past listing and birth-date framing
//! - **waitlist_queue**: per-gender ranking and duplicate keys
//! - **litter_service**, **puppy_service**: the litter aggregate and its cascade
//! - **grumble_service**: breeding stock, referenced as litter parents
//! - **waitlist_service**, **settings_service**: registration, lookup and the open/closed switch
//! - **image_lifecycle**: releasing image blobs after their owners are deleted
//!
//! ## Business Rules
//!
//! - A puppy belongs to exactly one litter; no operation writes an orphan
//! - A litter is current while it has no puppies or any puppy is not sold
//! - Deleting a litter removes its puppies and releases every image they held
//! - A phone number holds at most one entry per (gender, color preference)
//! - Waitlist rank is the submission order within a gender, whatever the color

pub mod commands;
pub mod errors;
pub mod grumble_service;
pub mod image_lifecycle;
pub mod litter_classification;
pub mod litter_service;
pub mod models;
pub mod puppy_service;
pub mod puppy_status;
pub mod settings_service;
pub mod validation;
pub mod waitlist_queue;
pub mod waitlist_service;

pub use errors::{KennelError, KennelResult};
pub use grumble_service::GrumbleService;
pub use image_lifecycle::ImageLifecycle;
pub use litter_classification::BusinessClock;
pub use litter_service::LitterService;
pub use puppy_service::PuppyService;
pub use settings_service::SettingsService;
pub use waitlist_service::WaitlistService;
