//! SQLite implementations of the storage traits

pub mod grumble_repository;
pub mod image_release_repository;
pub mod litter_repository;
pub mod puppy_repository;
pub mod settings_repository;
pub mod waitlist_repository;

pub use grumble_repository::GrumbleRepository;
pub use image_release_repository::ImageReleaseRepository;
pub use litter_repository::LitterRepository;
pub use puppy_repository::PuppyRepository;
pub use settings_repository::SettingsRepository;
pub use waitlist_repository::WaitlistRepository;
