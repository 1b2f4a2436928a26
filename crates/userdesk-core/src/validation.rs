//! Client-side checks run before any request is issued.

use std::sync::LazyLock;

use regex::Regex;

/// Message shown when a required field is blank.
pub const MISSING_FIELDS: &str = "Please fill in all fields.";

/// Message shown when the email does not look like `local@domain.tld`.
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Returns true if every field is non-empty after trimming.
pub fn all_filled(fields: &[&str]) -> bool {
    fields.iter().all(|field| !field.trim().is_empty())
}

/// Returns true if `email` has the shape `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Checks required fields, then (if given) the email shape.
///
/// # Errors
/// Returns the message to display for the first failing check.
pub fn check_fields(required: &[&str], email: Option<&str>) -> Result<(), &'static str> {
    if !all_filled(required) {
        return Err(MISSING_FIELDS);
    }
    if let Some(email) = email
        && !is_valid_email(email.trim())
    {
        return Err(INVALID_EMAIL);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail() {
        assert!(!all_filled(&["bob", ""]));
        assert!(!all_filled(&["   ", "pw"]));
        assert!(!all_filled(&["bob", "\t\n"]));
        assert!(all_filled(&["bob", "pw"]));
        assert!(all_filled(&[]));
    }

    #[test]
    fn email_shape() {
        for ok in ["b@x.com", "first.last@sub.example.org", "a@b.c"] {
            assert!(is_valid_email(ok), "{ok} should be accepted");
        }
        for bad in [
            "",
            "bob",
            "bob@",
            "@x.com",
            "bob@x",
            "bob@x.",
            "bob @x.com",
            "bob@x .com",
            "bob@@x.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn check_fields_reports_missing_before_email() {
        assert_eq!(check_fields(&["", "pw"], Some("nope")), Err(MISSING_FIELDS));
        assert_eq!(check_fields(&["bob", "pw"], Some("nope")), Err(INVALID_EMAIL));
        assert_eq!(check_fields(&["bob", "pw"], Some(" b@x.com ")), Ok(()));
        assert_eq!(check_fields(&["bob", "pw"], None), Ok(()));
    }
}
