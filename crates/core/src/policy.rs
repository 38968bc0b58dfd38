//! Shared building blocks for validation policies.
//!
//! Policies are pure `data in → result out` functions. A failed check is an
//! ordinary `Err(DomainError::Validation(..))` rather than a panic, so aggregate
//! constructors can chain several checks with `?` and get deterministic error
//! precedence.

use crate::error::{DomainError, DomainResult};

/// Outcome of a single policy check: the validated value or the broken rule.
pub type PolicyResult<T> = DomainResult<T>;

/// Value must contain something other than whitespace.
pub fn require_present<'a>(value: &'a str, field: &str) -> PolicyResult<&'a str> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Value must be at most `max` characters long (counted as Unicode scalars).
pub fn require_max_chars<'a>(value: &'a str, max: usize, field: &str) -> PolicyResult<&'a str> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

/// Value length must fall within `min..=max` characters.
pub fn require_char_range<'a>(
    value: &'a str,
    min: usize,
    max: usize,
    field: &str,
) -> PolicyResult<&'a str> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value)
}

/// Value must consist of ASCII uppercase letters and digits only.
pub fn require_upper_alnum<'a>(value: &'a str, field: &str) -> PolicyResult<&'a str> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !valid {
        return Err(DomainError::validation(format!(
            "{field} may only contain uppercase letters and digits"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_present_rejects_blank() {
        assert!(require_present("  ", "name").is_err());
        assert_eq!(require_present(" a ", "name").unwrap(), " a ");
    }

    #[test]
    fn require_max_chars_counts_characters_not_bytes() {
        assert!(require_max_chars("가나다", 3, "name").is_ok());
        assert!(require_max_chars("가나다라", 3, "name").is_err());
    }

    #[test]
    fn require_char_range_reports_bounds() {
        let err = require_char_range("AB", 3, 20, "code").unwrap_err();
        assert_eq!(err.message(), "code must be between 3 and 20 characters");
    }

    #[test]
    fn require_upper_alnum_rejects_lowercase_and_symbols() {
        assert!(require_upper_alnum("ABC123", "code").is_ok());
        assert!(require_upper_alnum("abc", "code").is_err());
        assert!(require_upper_alnum("AB-1", "code").is_err());
        assert!(require_upper_alnum("", "code").is_err());
    }
}
