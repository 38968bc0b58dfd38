use serde::{Deserialize, Serialize};

use tradedesk_core::{DomainError, DomainResult, ValueObject};

/// Phone number stored as its bare digits.
///
/// Input may contain whitespace and dashes (`010-1234-5678`, `02 123 4567`);
/// both are stripped before validation. 10 and 11 digit numbers are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(input: &str) -> DomainResult<Self> {
        let digits: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        let valid = (10..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(DomainError::validation(
                "phone number must consist of 10 or 11 digits",
            ));
        }
        Ok(Self(digits))
    }

    /// Digits only.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `XXX-XXX-XXXX` for 10 digit numbers, the bare digits otherwise.
    pub fn formatted(&self) -> String {
        if self.0.len() == 10 {
            format!("{}-{}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
        } else {
            self.0.clone()
        }
    }
}

impl ValueObject for PhoneNumber {}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl core::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.formatted())
    }
}
