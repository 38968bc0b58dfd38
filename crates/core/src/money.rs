//! `Money`: exact-integer currency amount.
//!
//! Amounts are kept in the smallest currency unit (e.g. won, cents) as an
//! unsigned integer. Scaling operations take floating factors, so their results
//! are re-validated exactly like raw input.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Largest amount that survives a round trip through `f64` without loss.
const MAX_EXACT_AMOUNT: u64 = (1 << 53) - 1;

/// Non-negative integer amount in the smallest currency unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from an integer amount.
    pub fn of(amount: i64) -> DomainResult<Self> {
        if amount < 0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        Ok(Self(amount as u64))
    }

    /// Construct from an untrusted floating-point amount.
    ///
    /// The value must be a finite, non-negative integer.
    pub fn from_f64(amount: f64) -> DomainResult<Self> {
        if amount.is_nan() {
            return Err(DomainError::validation("amount must be a number"));
        }
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be finite"));
        }
        if amount.fract() != 0.0 {
            return Err(DomainError::validation("amount must be an integer"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        if amount > MAX_EXACT_AMOUNT as f64 {
            return Err(DomainError::validation("amount exceeds the supported range"));
        }
        Ok(Self(amount as u64))
    }

    pub fn amount(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn add(&self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::validation("amount exceeds the supported range"))
    }

    pub fn subtract(&self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::validation("amount cannot be negative"))
    }

    /// Scale by `factor`; the product must itself be a valid amount.
    pub fn multiply(&self, factor: f64) -> DomainResult<Money> {
        Money::from_f64(self.0 as f64 * factor)
    }

    /// Divide by `divisor`; the quotient must itself be a valid amount.
    pub fn divide(&self, divisor: f64) -> DomainResult<Money> {
        if divisor == 0.0 {
            return Err(DomainError::validation("cannot divide an amount by zero"));
        }
        Money::from_f64(self.0 as f64 / divisor)
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
