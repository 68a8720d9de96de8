//! Domain models. These carry parsed, validated values (calendar dates,
//! enums, normalized phone numbers); the REST layer maps them to the wire
//! DTOs in the `shared` crate.

pub mod grumble;
pub mod litter;
pub mod puppy;
pub mod waitlist;

use uuid::Uuid;

pub use grumble::GRUMBLE_PLACEHOLDER_IMAGE;
pub use litter::LITTER_PLACEHOLDER_IMAGE;
pub use puppy::PUPPY_PLACEHOLDER_IMAGE;

/// Generate an entity ID in the form `<kind>::<epoch_millis>::<8 hex chars>`.
///
/// The random suffix keeps IDs unique when several records are created in the
/// same millisecond (batch puppy inserts).
pub fn generate_id(kind: &str, epoch_millis: u64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}::{}::{}", kind, epoch_millis, &suffix[..8])
}

/// Placeholder images are shared defaults and are never released
pub fn is_placeholder_image(key: &str) -> bool {
    matches!(
        key,
        LITTER_PLACEHOLDER_IMAGE | PUPPY_PLACEHOLDER_IMAGE | GRUMBLE_PLACEHOLDER_IMAGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id("litter", 1702516122000);
        let parts: Vec<&str> = id.split("::").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "litter");
        assert_eq!(parts[1], "1702516122000");
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_generate_id_unique_within_same_millis() {
        let a = generate_id("puppy", 1);
        let b = generate_id("puppy", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder_image("litter-placeholder.jpg"));
        assert!(is_placeholder_image("grumble-placeholder.jpg"));
        assert!(!is_placeholder_image("litter-1702516122000.jpg"));
    }
}
