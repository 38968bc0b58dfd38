//! Staff and role validation policies.

use once_cell::sync::Lazy;
use regex::Regex;

use tradedesk_core::policy::{require_char_range, require_max_chars, require_present, require_upper_alnum};
use tradedesk_core::{DomainError, PolicyResult};

pub const MAX_NOTE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 200;

static EMAIL_PATTERN: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
});

fn is_hangul_syllable(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

pub struct StaffPolicy;

impl StaffPolicy {
    /// Two to five Hangul syllables, nothing else.
    pub fn validate_name(name: &str) -> PolicyResult<String> {
        let len = name.chars().count();
        if !(2..=5).contains(&len) || !name.chars().all(is_hangul_syllable) {
            return Err(DomainError::validation(
                "staff name must be 2 to 5 Hangul characters",
            ));
        }
        Ok(name.to_string())
    }

    pub fn validate_email(email: &str) -> PolicyResult<String> {
        let pattern = EMAIL_PATTERN
            .as_ref()
            .map_err(|e| DomainError::invariant(format!("email pattern is invalid: {e}")))?;
        if !pattern.is_match(email) {
            return Err(DomainError::validation("email address is malformed"));
        }
        Ok(email.to_string())
    }

    pub fn validate_note(note: &str) -> PolicyResult<String> {
        require_max_chars(note, MAX_NOTE_LEN, "note")?;
        Ok(note.to_string())
    }
}

pub struct RolePolicy;

impl RolePolicy {
    /// Uppercase letters and digits, 3 to 20 characters.
    pub fn validate_code(code: &str) -> PolicyResult<String> {
        require_present(code, "role code")?;
        require_upper_alnum(code, "role code")?;
        require_char_range(code, 3, 20, "role code")?;
        Ok(code.to_string())
    }

    /// Hangul, latin letters, digits and spaces; 3 to 50 characters.
    pub fn validate_name(name: &str) -> PolicyResult<String> {
        require_present(name, "role name")?;
        let allowed = name
            .chars()
            .all(|c| is_hangul_syllable(c) || c.is_ascii_alphanumeric() || c.is_whitespace());
        if !allowed {
            return Err(DomainError::validation(
                "role name may only contain Hangul, latin letters, digits and spaces",
            ));
        }
        require_char_range(name, 3, 50, "role name")?;
        Ok(name.to_string())
    }

    pub fn validate_description(description: &str) -> PolicyResult<String> {
        require_max_chars(description, MAX_DESCRIPTION_LEN, "role description")?;
        Ok(description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_name_accepts_hangul() {
        assert_eq!(StaffPolicy::validate_name("홍길동").unwrap(), "홍길동");
        assert!(StaffPolicy::validate_name("남궁민수아").is_ok());
    }

    #[test]
    fn staff_name_rejects_other_scripts_and_lengths() {
        for name in ["홍", "홍길동홍길동", "Hong", "홍 길동", ""] {
            let err = StaffPolicy::validate_name(name).unwrap_err();
            assert_eq!(err.message(), "staff name must be 2 to 5 Hangul characters");
        }
    }

    #[test]
    fn email() {
        assert!(StaffPolicy::validate_email("staff.member@example.co.kr").is_ok());
        assert!(StaffPolicy::validate_email("a+b@mail.example.com").is_ok());
        for email in ["John.Doe@Example.com", "USER@EXAMPLE.COM", "kim@Naver.com"] {
            assert_eq!(StaffPolicy::validate_email(email).unwrap(), email);
        }

        for email in ["", "plain", "@example.com", "user@", "user@example", "a b@example.com"] {
            let err = StaffPolicy::validate_email(email).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{email}");
        }
    }

    #[test]
    fn note_length() {
        assert!(StaffPolicy::validate_note(&"n".repeat(200)).is_ok());
        assert_eq!(
            StaffPolicy::validate_note(&"n".repeat(201)).unwrap_err().message(),
            "note must be at most 200 characters"
        );
    }

    #[test]
    fn role_code_rules_in_order() {
        assert_eq!(RolePolicy::validate_code("ADMIN").unwrap(), "ADMIN");
        assert_eq!(
            RolePolicy::validate_code(" ").unwrap_err().message(),
            "role code is required"
        );
        assert_eq!(
            RolePolicy::validate_code("admin").unwrap_err().message(),
            "role code may only contain uppercase letters and digits"
        );
        assert_eq!(
            RolePolicy::validate_code("AB").unwrap_err().message(),
            "role code must be between 3 and 20 characters"
        );
        assert!(RolePolicy::validate_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn role_name_rules() {
        assert!(RolePolicy::validate_name("Store Manager 2").is_ok());
        assert!(RolePolicy::validate_name("매장 관리자").is_ok());
        assert!(RolePolicy::validate_name("Ops!").is_err());
        assert!(RolePolicy::validate_name("ab").is_err());
        assert!(RolePolicy::validate_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn role_description_length() {
        assert!(RolePolicy::validate_description(&"d".repeat(200)).is_ok());
        assert!(RolePolicy::validate_description(&"d".repeat(201)).is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any 2-5 syllable Hangul name is accepted.
            #[test]
            fn hangul_names_accepted(name in "[가-힣]{2,5}") {
                prop_assert!(StaffPolicy::validate_name(&name).is_ok());
            }

            /// Property: valid role codes round-trip unchanged.
            #[test]
            fn role_codes_accepted(code in "[A-Z0-9]{3,20}") {
                prop_assert_eq!(RolePolicy::validate_code(&code).unwrap(), code);
            }
        }
    }
}
