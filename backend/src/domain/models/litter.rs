use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::puppy::DomainPuppy;

pub const LITTER_PLACEHOLDER_IMAGE: &str = "litter-placeholder.jpg";

/// A litter parent as stored: either a grumble member reference or the name of
/// a dog from outside the kennel. `display_name` is resolved on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub member_id: Option<String>,
    pub external_name: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLitter {
    pub id: String,
    pub name: String,
    pub mother: ParentRef,
    pub father: ParentRef,
    pub birth_date: NaiveDate,
    pub available_date: NaiveDate,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The litter aggregate: a litter and every puppy it owns, read together
#[derive(Debug, Clone, PartialEq)]
pub struct LitterWithPuppies {
    pub litter: DomainLitter,
    pub puppies: Vec<DomainPuppy>,
}
