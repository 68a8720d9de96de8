use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Gender, PuppyColor, PuppyStatus};

pub const PUPPY_PLACEHOLDER_IMAGE: &str = "puppy-placeholder.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainPuppy {
    pub id: String,
    pub litter_id: String,
    pub name: String,
    pub color: PuppyColor,
    pub gender: Gender,
    pub status: PuppyStatus,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
