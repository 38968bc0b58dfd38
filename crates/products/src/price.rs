//! `Price`: a tax-exclusive amount plus a tax rate.
//!
//! The tax-inclusive amount is always derived from the exclusive base:
//! `with_tax = round(without_tax * (100 + rate) / 100)`. Building a price from an
//! inclusive total back-computes the base first and then derives the inclusive
//! amount again, so for rates that do not divide the total evenly the stored
//! inclusive amount can differ from the caller's total by rounding.

use serde::{Deserialize, Serialize};

use tradedesk_core::{DomainError, DomainResult, Money, ValueObject};

/// Tax rate (percent) used when none is given.
pub const DEFAULT_TAX_RATE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceRecord")]
pub struct Price {
    without_tax: Money,
    with_tax: Money,
    tax_rate: f64,
}

/// Wire shape accepted when deserializing; `with_tax` is optional and, when
/// present, must agree with the derived amount.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    without_tax: Money,
    tax_rate: f64,
    #[serde(default)]
    with_tax: Option<Money>,
}

impl TryFrom<PriceRecord> for Price {
    type Error = DomainError;

    fn try_from(record: PriceRecord) -> Result<Self, Self::Error> {
        let price = Price::of_rate(record.without_tax, record.tax_rate)?;
        match record.with_tax {
            Some(with_tax) if with_tax != price.with_tax => Err(DomainError::validation(format!(
                "tax-inclusive amount {with_tax} does not match {} derived from the base amount",
                price.with_tax
            ))),
            _ => Ok(price),
        }
    }
}

impl Price {
    /// Price from a tax-exclusive amount at the default rate.
    pub fn of(without_tax: Money) -> DomainResult<Self> {
        Self::of_rate(without_tax, DEFAULT_TAX_RATE)
    }

    /// Price from a tax-exclusive amount at `tax_rate` percent.
    pub fn of_rate(without_tax: Money, tax_rate: f64) -> DomainResult<Self> {
        validate_tax_rate(tax_rate)?;

        let with_tax =
            Money::from_f64((without_tax.amount() as f64 * (100.0 + tax_rate) / 100.0).round())?;
        if with_tax < without_tax {
            return Err(DomainError::validation("tax was calculated incorrectly"));
        }

        Ok(Self {
            without_tax,
            with_tax,
            tax_rate,
        })
    }

    /// Price from a tax-inclusive total at the default rate.
    pub fn with_tax(total: Money) -> DomainResult<Self> {
        Self::with_tax_rate(total, DEFAULT_TAX_RATE)
    }

    /// Price from a tax-inclusive total at `tax_rate` percent.
    ///
    /// The inclusive amount is recomputed from the rounded base rather than
    /// copied from `total`.
    pub fn with_tax_rate(total: Money, tax_rate: f64) -> DomainResult<Self> {
        validate_tax_rate(tax_rate)?;
        let without_tax =
            Money::from_f64((total.amount() as f64 * 100.0 / (100.0 + tax_rate)).round())?;
        Self::of_rate(without_tax, tax_rate)
    }

    pub fn without_tax(&self) -> Money {
        self.without_tax
    }

    pub fn with_tax_amount(&self) -> Money {
        self.with_tax
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// `with_tax - without_tax`.
    pub fn tax_amount(&self) -> Money {
        // with_tax >= without_tax is checked on construction.
        self.with_tax
            .subtract(self.without_tax)
            .unwrap_or(Money::ZERO)
    }
}

impl ValueObject for Price {}

fn validate_tax_rate(tax_rate: f64) -> DomainResult<()> {
    if tax_rate.is_nan() {
        return Err(DomainError::validation("tax rate must be a number"));
    }
    if tax_rate < 0.0 {
        return Err(DomainError::validation("tax rate must be at least 0"));
    }
    if tax_rate > 100.0 {
        return Err(DomainError::validation("tax rate must be at most 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(amount: i64) -> Money {
        Money::of(amount).unwrap()
    }

    #[test]
    fn of_rate_derives_tax_inclusive_amount() {
        let price = Price::of_rate(money(10_000), 20.0).unwrap();
        assert_eq!(price.without_tax(), money(10_000));
        assert_eq!(price.with_tax_amount(), money(12_000));
        assert_eq!(price.tax_amount(), money(2_000));
    }

    #[test]
    fn of_uses_default_rate() {
        let price = Price::of(money(10_000)).unwrap();
        assert_eq!(price.tax_rate(), DEFAULT_TAX_RATE);
        assert_eq!(price.with_tax_amount(), money(11_000));
    }

    #[test]
    fn with_tax_back_computes_base() {
        let price = Price::with_tax_rate(money(11_000), 10.0).unwrap();
        assert_eq!(price.without_tax(), money(10_000));
        assert_eq!(price.with_tax_amount(), money(11_000));
    }

    #[test]
    fn with_tax_recomputes_inclusive_amount_from_rounded_base() {
        // 1001 * 100 / 110 = 910.0909.. -> 910; 910 * 1.1 = 1001.
        let price = Price::with_tax(money(1_001)).unwrap();
        assert_eq!(price.without_tax(), money(910));
        assert_eq!(price.with_tax_amount(), money(1_001));

        // 1000 * 100 / 107 = 934.579.. -> 935; 935 * 1.07 = 1000.45 -> 1000.
        let price = Price::with_tax_rate(money(1_000), 7.0).unwrap();
        assert_eq!(price.without_tax(), money(935));
        assert_eq!(price.with_tax_amount(), money(1_000));

        // 6 * 100 / 133 = 4.51.. -> 5; 5 * 1.33 = 6.65 -> 7, not the 6 that was given.
        let price = Price::with_tax_rate(money(6), 33.0).unwrap();
        assert_eq!(price.without_tax(), money(5));
        assert_eq!(price.with_tax_amount(), money(7));
    }

    #[test]
    fn tax_rate_bounds_are_inclusive() {
        assert!(Price::of_rate(money(100), 0.0).is_ok());
        assert!(Price::of_rate(money(100), 100.0).is_ok());
    }

    #[test]
    fn tax_rate_out_of_range_fails_with_distinct_messages() {
        let below = Price::of_rate(money(100), -0.5).unwrap_err();
        let above = Price::of_rate(money(100), 100.5).unwrap_err();
        assert_eq!(below.message(), "tax rate must be at least 0");
        assert_eq!(above.message(), "tax rate must be at most 100");
        assert!(Price::with_tax_rate(money(100), 101.0).is_err());
        assert!(Price::of_rate(money(100), f64::NAN).is_err());
    }

    #[test]
    fn zero_rate_has_no_tax() {
        let price = Price::of_rate(money(12_345), 0.0).unwrap();
        assert_eq!(price.with_tax_amount(), price.without_tax());
        assert!(price.tax_amount().is_zero());
    }

    #[test]
    fn serde_rejects_inconsistent_inclusive_amount() {
        let ok: Price =
            serde_json::from_str(r#"{"without_tax":10000,"with_tax":11000,"tax_rate":10.0}"#)
                .unwrap();
        assert_eq!(ok, Price::of(money(10_000)).unwrap());

        let bad = serde_json::from_str::<Price>(
            r#"{"without_tax":10000,"with_tax":99999,"tax_rate":10.0}"#,
        );
        assert!(bad.is_err());

        let bad_rate =
            serde_json::from_str::<Price>(r#"{"without_tax":10000,"tax_rate":150.0}"#);
        assert!(bad_rate.is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: tax amount is exactly the difference of the two amounts.
            #[test]
            fn tax_amount_is_difference(base in 0i64..1_000_000_000, rate in 0u32..=100) {
                let price = Price::of_rate(money(base), rate as f64).unwrap();
                prop_assert_eq!(
                    price.tax_amount().amount(),
                    price.with_tax_amount().amount() - base as u64
                );
            }

            /// Property: evenly dividing totals survive the inclusive round trip.
            #[test]
            fn even_totals_round_trip(units in 0i64..10_000_000, rate in 0u32..=100) {
                let base = units * 100;
                let forward = Price::of_rate(money(base), rate as f64).unwrap();
                let back = Price::with_tax_rate(forward.with_tax_amount(), rate as f64).unwrap();
                prop_assert_eq!(back.without_tax(), money(base));
                prop_assert_eq!(back.with_tax_amount(), forward.with_tax_amount());
            }

            /// Property: building from a total is consistent with building from its base.
            #[test]
            fn with_tax_is_consistent_with_forward(total in 0i64..1_000_000_000, rate in 0u32..=100) {
                let price = Price::with_tax_rate(money(total), rate as f64).unwrap();
                let forward = Price::of_rate(price.without_tax(), rate as f64).unwrap();
                prop_assert_eq!(price, forward);
            }
        }
    }
}
