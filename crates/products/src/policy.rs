//! Product validation policy.
//!
//! Each check is a pure function returning the validated value or the broken
//! rule. `Product` construction chains them in a fixed order
//! (code → name → categories → price) and stops at the first failure.

use std::collections::HashSet;

use tradedesk_core::policy::{require_present, require_upper_alnum};
use tradedesk_core::{DomainError, PolicyResult};

use crate::category::Category;
use crate::price::Price;
use crate::product::ProductCode;

/// Minimum length of a product code.
pub const MIN_CODE_LEN: usize = 3;

pub struct ProductPolicy;

impl ProductPolicy {
    /// Code is trimmed, at least three characters, uppercase letters and digits.
    pub fn validate_code(code: &str) -> PolicyResult<ProductCode> {
        let code = code.trim();
        if code.chars().count() < MIN_CODE_LEN {
            return Err(DomainError::validation(
                "product code must be at least 3 characters",
            ));
        }
        require_upper_alnum(code, "product code")?;
        Ok(ProductCode(code.to_string()))
    }

    /// Name must not be blank; surrounding whitespace is dropped.
    pub fn validate_name(name: &str) -> PolicyResult<String> {
        let name = require_present(name, "product name")?;
        Ok(name.trim().to_string())
    }

    /// At least one category, each id at most once.
    pub fn validate_categories(categories: &[Category]) -> PolicyResult<Vec<Category>> {
        if categories.is_empty() {
            return Err(DomainError::validation(
                "a product needs at least one category",
            ));
        }

        let mut seen = HashSet::with_capacity(categories.len());
        for category in categories {
            if !seen.insert(category.id_typed()) {
                return Err(DomainError::validation(format!(
                    "category {} is listed more than once",
                    category.id_typed()
                )));
            }
        }
        Ok(categories.to_vec())
    }

    pub fn validate_price(price: Option<&Price>) -> PolicyResult<Price> {
        price
            .copied()
            .ok_or_else(|| DomainError::validation("product price is required"))
    }
}
