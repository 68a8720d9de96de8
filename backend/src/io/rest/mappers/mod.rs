//! Conversions between the wire DTOs in `shared` and domain types

pub mod grumble_mapper;
pub mod litter_mapper;
pub mod puppy_mapper;
pub mod waitlist_mapper;

pub use grumble_mapper::GrumbleMapper;
pub use litter_mapper::LitterMapper;
pub use puppy_mapper::PuppyMapper;
pub use waitlist_mapper::WaitlistMapper;
