//! Error taxonomy shared by every kennel service.

use shared::{ColorPreference, EnumParseError, Gender};

#[derive(Debug, thiserror::Error)]
pub enum KennelError {
    /// Malformed or missing input. `missing` lists required fields that were absent.
    #[error("{message}")]
    Validation { missing: Vec<String>, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("You are already on the waitlist for {color} {gender}.")]
    DuplicateEntry { gender: Gender, color: ColorPreference },

    #[error("Authorization required")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("The waitlist is currently closed")]
    WaitlistClosed,

    /// Rows were removed but some image blobs could not be released. The keys
    /// stay in the release queue and are retried at the next startup.
    #[error("{entity} {id} was deleted but {} image(s) could not be released", unreleased.len())]
    CascadeFailure {
        entity: &'static str,
        id: String,
        unreleased: Vec<String>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

pub type KennelResult<T> = Result<T, KennelError>;

impl KennelError {
    pub fn invalid(message: impl Into<String>) -> Self {
        KennelError::Validation {
            missing: Vec::new(),
            message: message.into(),
        }
    }

    pub fn missing_fields(missing: Vec<String>) -> Self {
        let message = format!(
            "Please fill in the following required fields: {}",
            missing.join(", ")
        );
        KennelError::Validation { missing, message }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        KennelError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KennelError::NotFound { .. })
    }
}

/// Repositories report through `anyhow`; recover the database error when there is one
impl From<anyhow::Error> for KennelError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(db_err) => KennelError::Storage(db_err),
            Err(other) => KennelError::Internal(other),
        }
    }
}

impl From<EnumParseError> for KennelError {
    fn from(err: EnumParseError) -> Self {
        KennelError::invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_the_segment() {
        let err = KennelError::DuplicateEntry {
            gender: Gender::Female,
            color: ColorPreference::Black,
        };
        assert_eq!(err.to_string(), "You are already on the waitlist for black female.");
    }

    #[test]
    fn test_missing_fields_message() {
        let err = KennelError::missing_fields(vec!["name".to_string(), "birth_date".to_string()]);
        assert_eq!(
            err.to_string(),
            "Please fill in the following required fields: name, birth_date"
        );
        match err {
            KennelError::Validation { missing, .. } => assert_eq!(missing.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cascade_failure_message() {
        let err = KennelError::CascadeFailure {
            entity: "Litter",
            id: "litter::1".to_string(),
            unreleased: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Litter litter::1 was deleted but 2 image(s) could not be released"
        );
    }

    #[test]
    fn test_anyhow_wrapping_sqlx_becomes_storage() {
        let err: KennelError = anyhow::Error::from(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, KennelError::Storage(_)));

        let err: KennelError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, KennelError::Internal(_)));
    }

    #[test]
    fn test_enum_parse_error_becomes_validation() {
        let parse_err = "Adopted".parse::<shared::PuppyStatus>().unwrap_err();
        let err: KennelError = parse_err.into();
        assert!(matches!(err, KennelError::Validation { ref missing, .. } if missing.is_empty()));
    }
}
