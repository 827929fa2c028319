//! Field-level validation for record payloads.
//!
//! Every failing field is collected before the payload is rejected, so a
//! client sees all problems in one response. Messages follow the wording an
//! admin form would show next to the field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::money;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// Implemented by every create/update payload.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Map of field name to the first problem found with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem; the first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Checks a required text field after trimming, optionally bounded in characters.
    pub fn require_text(&mut self, field: &str, value: &str, max_length: Option<usize>) {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, REQUIRED_MESSAGE);
            return;
        }

        if let Some(max) = max_length {
            let length = value.chars().count();
            if length > max {
                self.add(
                    field,
                    format!("Ensure this value has at most {max} characters (it has {length})."),
                );
            }
        }
    }

    pub fn require_email(&mut self, field: &str, value: &str, max_length: usize) {
        self.require_text(field, value, Some(max_length));
        let value = value.trim();
        if !value.is_empty() && !is_valid_email(value) {
            self.add(field, INVALID_EMAIL_MESSAGE);
        }
    }

    pub fn require_money(&mut self, field: &str, value: &Decimal) {
        if let Err(err) = money::check(value) {
            self.add(field, err.to_string());
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_require_text_blank_and_length() {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", "   ", Some(100));
        errors.require_text("unit_number", "12345678901", Some(10));
        errors.require_text("description", "long enough", None);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
        assert_eq!(
            errors.get("unit_number"),
            Some("Ensure this value has at most 10 characters (it has 11).")
        );
        assert!(errors.get("description").is_none());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        errors.require_text("unit_number", "ÄÖÜäöüßéèê", Some(10));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("j.rivera@example.com"));
        assert!(is_valid_email("first+tag@sub.example.co"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("spaces in@example.com"));

        let mut errors = ValidationErrors::new();
        errors.require_email("email", "not-an-email", 254);
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL_MESSAGE));

        let mut blank = ValidationErrors::new();
        blank.require_email("email", "", 254);
        assert_eq!(blank.get("email"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("rent", "first");
        errors.add("rent", "second");
        assert_eq!(errors.get("rent"), Some("first"));
    }

    #[test]
    fn test_money_field() {
        let mut errors = ValidationErrors::new();
        errors.require_money("rent", &Decimal::from_str("10.001").unwrap());
        assert_eq!(
            errors.get("rent"),
            Some("Ensure that there are no more than 2 decimal places.")
        );
    }

    #[test]
    fn test_serializes_as_flat_map_and_displays() {
        let mut errors = ValidationErrors::new();
        errors.add("name", REQUIRED_MESSAGE);
        errors.add("email", INVALID_EMAIL_MESSAGE);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], REQUIRED_MESSAGE);
        assert_eq!(json["email"], INVALID_EMAIL_MESSAGE);
        assert_eq!(
            errors.to_string(),
            "email: Enter a valid email address.; name: This field is required."
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
