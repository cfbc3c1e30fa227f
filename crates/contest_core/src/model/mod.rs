//! Contest domain model.
//!
//! # Responsibility
//! - Define the canonical records persisted by the contest store.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - `Team::points` is derived from scores and never set by callers.

pub mod address;
pub mod score;
pub mod state;
pub mod task;
pub mod team;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

static PASSCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6}$").expect("valid passcode regex"));
static PINCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid pincode regex"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid url regex"));

/// Field-level validation failure for contest records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be nil")]
    NilId { field: &'static str },
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("passcode must be exactly 6 ASCII letters or digits, got `{0}`")]
    InvalidPasscode(String),
    #[error("pincode must be exactly 6 digits, got `{0}`")]
    InvalidPincode(String),
    #[error("unknown state `{0}`")]
    UnknownState(String),
    #[error("submission link must be an absolute http(s) URL, got `{0}`")]
    InvalidUrl(String),
    #[error("team member must differ from leader {0}")]
    LeaderIsMember(Uuid),
}

pub(crate) fn require_id(field: &'static str, id: Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId { field });
    }
    Ok(())
}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    limit_text(field, value, max)
}

pub(crate) fn limit_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Returns whether `value` is a well-formed team passcode.
pub fn is_valid_passcode(value: &str) -> bool {
    PASSCODE_RE.is_match(value)
}

/// Returns whether `value` is a well-formed 6-digit postal code.
pub fn is_valid_pincode(value: &str) -> bool {
    PINCODE_RE.is_match(value)
}

/// Returns whether `value` looks like an absolute http(s) URL.
pub fn is_valid_url(value: &str) -> bool {
    URL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_passcode, is_valid_pincode, is_valid_url, require_text, ValidationError};

    #[test]
    fn passcode_shape() {
        assert!(is_valid_passcode("AB12CD"));
        assert!(!is_valid_passcode("AB12C"));
        assert!(!is_valid_passcode("AB12CD7"));
        assert!(!is_valid_passcode("AB-2CD"));
    }

    #[test]
    fn pincode_shape() {
        assert!(is_valid_pincode("560001"));
        assert!(!is_valid_pincode("56000A"));
        assert!(!is_valid_pincode("5600011"));
    }

    #[test]
    fn url_shape() {
        assert!(is_valid_url("https://forms.example.com/t1"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("example.com/form"));
    }

    #[test]
    fn require_text_counts_chars_not_bytes() {
        assert!(require_text("city", "Bengaluru", 50).is_ok());
        assert_eq!(
            require_text("city", "   ", 50).unwrap_err(),
            ValidationError::Blank { field: "city" }
        );
        let err = require_text("teamname", &"ä".repeat(31), 30).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "teamname",
                max: 30,
                actual: 31
            }
        );
    }
}
