use chrono::{DateTime, Utc};
use shared::{ColorPreference, Gender, WaitlistStatus};

use crate::domain::errors::{KennelError, KennelResult};

/// A US phone number reduced to its 10 digits. Identity comparisons on the
/// waitlist always use this form; `formatted` is for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> KennelResult<Self> {
        let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 11 && digits.starts_with('1') {
            digits.remove(0);
        }
        if digits.len() != 10 {
            return Err(KennelError::invalid(format!(
                "Phone number must contain 10 digits, got {}",
                digits.len()
            )));
        }
        Ok(Self(digits))
    }

    /// Wrap digits already normalized by `parse` (e.g. read back from storage)
    pub fn from_normalized(digits: String) -> Self {
        Self(digits)
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// XXX-XXX-XXXX
    pub fn formatted(&self) -> String {
        if self.0.len() != 10 {
            return self.0.clone();
        }
        format!("{}-{}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainWaitlistEntry {
    pub id: String,
    /// Storage insertion sequence; breaks ties between equal submission timestamps
    pub seq: i64,
    pub name: String,
    pub phone: PhoneNumber,
    pub gender_preference: Gender,
    pub color_preference: ColorPreference,
    pub status: WaitlistStatus,
    pub notes: String,
    pub submitted_at: DateTime<Utc>,
}
