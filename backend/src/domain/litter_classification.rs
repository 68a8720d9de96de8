//! # Litter classification
//!
//! Whether a litter is listed as current or past is never stored; it is
//! derived from the statuses of its puppies every time the litter is read.
//!
//! - **Current**: no puppies yet, or at least one puppy `Available`/`Reserved`
//! - **Past**: one or more puppies, all `Sold`
//!
//! The birth date is framed relative to "today" in the kennel's business
//! timezone: "Expected by" while the date is still in the future, "Born on"
//! from that day onward.

use chrono::{FixedOffset, NaiveDate, Utc};
use shared::{LitterClassification, PuppyStatus};

use super::models::litter::LitterWithPuppies;

pub fn classify_statuses<I>(statuses: I) -> LitterClassification
where
    I: IntoIterator<Item = PuppyStatus>,
{
    let mut any_puppies = false;
    for status in statuses {
        if status.is_open() {
            return LitterClassification::Current;
        }
        any_puppies = true;
    }

    if any_puppies {
        LitterClassification::Past
    } else {
        LitterClassification::Current
    }
}

pub fn classify(litter: &LitterWithPuppies) -> LitterClassification {
    classify_statuses(litter.puppies.iter().map(|p| p.status))
}

/// Split one snapshot of litters into (current, past), keeping input order
pub fn partition(
    litters: Vec<LitterWithPuppies>,
) -> (Vec<LitterWithPuppies>, Vec<LitterWithPuppies>) {
    litters
        .into_iter()
        .partition(|l| classify(l) == LitterClassification::Current)
}

/// Source of "today" in the business timezone
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
    fixed_today: Option<NaiveDate>,
}

impl BusinessClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            fixed_today: None,
        }
    }

    /// A clock pinned to one calendar date
    pub fn fixed(offset: FixedOffset, today: NaiveDate) -> Self {
        Self {
            offset,
            fixed_today: Some(today),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset).date_naive())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthFraming {
    ExpectedBy(NaiveDate),
    BornOn(NaiveDate),
}

impl BirthFraming {
    pub fn label(&self) -> &'static str {
        match self {
            BirthFraming::ExpectedBy(_) => "Expected by",
            BirthFraming::BornOn(_) => "Born on",
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            BirthFraming::ExpectedBy(d) | BirthFraming::BornOn(d) => *d,
        }
    }
}

pub fn frame_birth_date(birth_date: NaiveDate, today: NaiveDate) -> BirthFraming {
    if birth_date > today {
        BirthFraming::ExpectedBy(birth_date)
    } else {
        BirthFraming::BornOn(birth_date)
    }
}
