//! Field-level input checks shared by the services.

use chrono::NaiveDate;

use super::errors::{KennelError, KennelResult};

/// Collects every absent required field so a request can be rejected with the
/// full list in one response rather than one field at a time.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed text value, recording `field` as missing when absent or blank
    pub fn text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = non_blank(value);
        if value.is_none() {
            self.mark(field);
        }
        value
    }

    pub fn mark(&mut self, field: &str) {
        self.missing.push(field.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn finish(self) -> KennelResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(KennelError::missing_fields(self.missing))
        }
    }
}

/// Trimmed copy of `value`, or `None` when it is absent or only whitespace
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a calendar date in YYYY-MM-DD form
pub fn parse_date(field: &str, value: &str) -> KennelResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        KennelError::invalid(format!(
            "Invalid {} '{}': expected a date in YYYY-MM-DD format",
            field, value
        ))
    })
}

pub fn check_max_len(field: &str, value: &str, max: usize) -> KennelResult<()> {
    if value.chars().count() > max {
        return Err(KennelError::invalid(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_reports_all_missing() {
        let mut required = RequiredFields::new();
        assert_eq!(required.text("name", Some("  Biscuit ")), Some("Biscuit".to_string()));
        assert_eq!(required.text("color", Some("   ")), None);
        assert_eq!(required.text("gender", None), None);

        match required.finish().unwrap_err() {
            KennelError::Validation { missing, .. } => assert_eq!(missing, vec!["color", "gender"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("birth_date", "2024-03-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(parse_date("birth_date", "03/09/2024").is_err());
        assert!(parse_date("birth_date", "2024-02-30").is_err());
    }

    #[test]
    fn test_check_max_len_counts_chars() {
        assert!(check_max_len("name", &"é".repeat(50), 50).is_ok());
        assert!(check_max_len("name", &"a".repeat(51), 50).is_err());
    }
}
