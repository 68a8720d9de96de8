//! Domain-level command and result types.
//!
//! Services take and return these; they are not exposed over the API. The
//! REST layer maps the DTOs in the `shared` crate to and from them. Text
//! fields stay raw (`Option<String>`) so the services can report every
//! missing field at once.

pub mod litters {
    use crate::domain::litter_classification::BirthFraming;
    use crate::domain::models::litter::LitterWithPuppies;
    use shared::LitterClassification;

    /// One parent as supplied: a grumble member id or an outside dog's name
    #[derive(Debug, Clone, Default)]
    pub struct ParentFields {
        pub member_id: Option<String>,
        pub external_name: Option<String>,
    }

    impl ParentFields {
        pub fn is_empty(&self) -> bool {
            blank(&self.member_id) && blank(&self.external_name)
        }
    }

    fn blank(value: &Option<String>) -> bool {
        value.as_deref().map(str::trim).unwrap_or("").is_empty()
    }

    #[derive(Debug, Clone, Default)]
    pub struct CreateLitterCommand {
        pub name: Option<String>,
        pub mother: ParentFields,
        pub father: ParentFields,
        pub birth_date: Option<String>,
        pub available_date: Option<String>,
        pub profile_image: Option<String>,
    }

    /// Partial update; `None` (or an empty parent) leaves the field unchanged
    #[derive(Debug, Clone, Default)]
    pub struct UpdateLitterCommand {
        pub name: Option<String>,
        pub mother: ParentFields,
        pub father: ParentFields,
        pub birth_date: Option<String>,
        pub available_date: Option<String>,
        pub profile_image: Option<String>,
    }

    /// A litter as read, with its derived listing and birth-date framing
    #[derive(Debug, Clone)]
    pub struct LitterView {
        pub litter: LitterWithPuppies,
        pub classification: LitterClassification,
        pub birth_framing: BirthFraming,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteLitterResult {
        pub litter_id: String,
        pub deleted_puppies: usize,
        pub released_images: usize,
    }
}

pub mod puppies {
    #[derive(Debug, Clone, Default)]
    pub struct CreatePuppyCommand {
        pub name: Option<String>,
        pub color: Option<String>,
        pub gender: Option<String>,
        pub status: Option<String>,
        pub price: Option<f64>,
        pub description: Option<String>,
        pub profile_image: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdatePuppyCommand {
        pub name: Option<String>,
        pub color: Option<String>,
        pub gender: Option<String>,
        pub status: Option<String>,
        pub price: Option<f64>,
        pub clear_price: bool,
        pub description: Option<String>,
        pub profile_image: Option<String>,
    }
}

pub mod grumble {
    #[derive(Debug, Clone, Default)]
    pub struct CreateGrumbleMemberCommand {
        pub name: Option<String>,
        pub gender: Option<String>,
        pub description: Option<String>,
        pub birth_date: Option<String>,
        pub profile_image: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateGrumbleMemberCommand {
        pub name: Option<String>,
        pub gender: Option<String>,
        pub description: Option<String>,
        pub birth_date: Option<String>,
        pub profile_image: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteGrumbleMemberResult {
        pub member_id: String,
        /// Litters that now carry the member's name as an external parent
        pub detached_litters: usize,
    }
}

pub mod waitlist {
    use crate::domain::waitlist_queue::QueuePosition;

    #[derive(Debug, Clone, Default)]
    pub struct JoinWaitlistCommand {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub gender_preference: Option<String>,
        pub color_preference: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateWaitlistEntryCommand {
        pub status: Option<String>,
        pub notes: Option<String>,
    }

    /// Result of a position lookup by phone number
    #[derive(Debug, Clone)]
    pub struct PositionLookupResult {
        pub positions: Vec<QueuePosition>,
        pub message: String,
    }
}
