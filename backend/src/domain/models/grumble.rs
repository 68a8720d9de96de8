use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::Gender;

pub const GRUMBLE_PLACEHOLDER_IMAGE: &str = "grumble-placeholder.jpg";

/// One of the kennel's adult breeding dogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainGrumbleMember {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub description: String,
    pub birth_date: NaiveDate,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
