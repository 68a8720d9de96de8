//! # Puppy status
//!
//! A puppy is always `Available`, `Reserved` or `Sold`. Any status may be
//! set to any other by an authorized update; there is no terminal state, so
//! a sale that falls through can put a `Sold` puppy back on the market. The
//! only rule enforced is that the written value is one of the three.

use shared::PuppyStatus;

use super::errors::KennelResult;

/// Status for a newly created puppy, `Available` unless the request names one
pub fn initial_status(requested: Option<&str>) -> KennelResult<PuppyStatus> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_status(value),
        None => Ok(PuppyStatus::default()),
    }
}

pub fn parse_status(value: &str) -> KennelResult<PuppyStatus> {
    Ok(value.parse::<PuppyStatus>()?)
}

/// A status change applied by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: PuppyStatus,
    pub to: PuppyStatus,
}

impl StatusTransition {
    /// Every transition is permitted
    pub fn new(from: PuppyStatus, to: PuppyStatus) -> Self {
        Self { from, to }
    }

    pub fn is_change(&self) -> bool {
        self.from != self.to
    }

    /// True when a sold puppy goes back on offer, which can move its litter
    /// from the past listing to the current one
    pub fn reopens(&self) -> bool {
        !self.from.is_open() && self.to.is_open()
    }

    pub fn closes(&self) -> bool {
        self.from.is_open() && !self.to.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::KennelError;

    #[test]
    fn test_initial_status_defaults_to_available() {
        assert_eq!(initial_status(None).unwrap(), PuppyStatus::Available);
        assert_eq!(initial_status(Some("")).unwrap(), PuppyStatus::Available);
        assert_eq!(initial_status(Some("Reserved")).unwrap(), PuppyStatus::Reserved);
    }

    #[test]
    fn test_unknown_status_is_a_validation_error() {
        let err = parse_status("Adopted").unwrap_err();
        assert!(matches!(err, KennelError::Validation { .. }));
    }

    #[test]
    fn test_all_transitions_are_allowed() {
        let statuses = [PuppyStatus::Available, PuppyStatus::Reserved, PuppyStatus::Sold];
        for from in statuses {
            for to in statuses {
                let t = StatusTransition::new(from, to);
                assert_eq!(t.is_change(), from != to);
            }
        }
    }

    #[test]
    fn test_reopen_and_close() {
        assert!(StatusTransition::new(PuppyStatus::Sold, PuppyStatus::Available).reopens());
        assert!(StatusTransition::new(PuppyStatus::Sold, PuppyStatus::Reserved).reopens());
        assert!(!StatusTransition::new(PuppyStatus::Reserved, PuppyStatus::Available).reopens());
        assert!(StatusTransition::new(PuppyStatus::Reserved, PuppyStatus::Sold).closes());
    }
}
