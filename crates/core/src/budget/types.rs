//! Budget data types.

use budgetly_shared::types::BudgetId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending category a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Commuting and travel costs.
    Transport,
    /// Leisure spending.
    Entertainment,
    /// Power, water, internet.
    Utilities,
    /// Housing.
    Rent,
    /// Medical and wellness.
    Health,
    /// Anything else.
    #[default]
    Others,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Utilities,
        Self::Rent,
        Self::Health,
        Self::Others,
    ];

    /// Returns the canonical name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Rent => "Rent",
            Self::Health => "Health",
            Self::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-sensitive, exact match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// A currency code made of exactly three uppercase ASCII letters.
///
/// Only the shape is checked; the code is not looked up in ISO 4217.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code, returning `None` unless it is `[A-Z]{3}`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let well_formed = code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase());
        well_formed.then(|| Self(code.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Invalid currency code: {value}"))
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A budget input that passed validation, with defaults applied.
///
/// Serializes to the same five keys it was validated from, so feeding the
/// serialized form back through the validator yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedBudget {
    /// Spending category.
    pub category: Category,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Spending limit, between 0 and 1,000,000 inclusive.
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    /// Calendar month, 1 through 12.
    pub month: u8,
    /// Calendar year, never before the year of validation.
    pub year: i32,
}

/// A stored budget record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Spending category.
    pub category: Category,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Spending limit.
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    /// Calendar month.
    pub month: u8,
    /// Calendar year.
    pub year: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Builds a new record from validated input.
    #[must_use]
    pub fn from_validated(id: BudgetId, input: ValidatedBudget, now: DateTime<Utc>) -> Self {
        Self {
            id,
            category: input.category,
            currency: input.currency,
            limit: input.limit,
            month: input.month,
            year: input.year,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the budget fields, keeping the ID and creation time.
    pub fn apply(&mut self, input: ValidatedBudget, now: DateTime<Utc>) {
        self.category = input.category;
        self.currency = input.currency;
        self.limit = input.limit;
        self.month = input.month;
        self.year = input.year;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Ok(category));
        }
    }

    #[rstest]
    #[case("food")]
    #[case("FOOD")]
    #[case(" Food")]
    #[case("Travel")]
    #[case("")]
    fn test_category_from_str_is_exact(#[case] input: &str) {
        assert!(Category::from_str(input).is_err());
    }

    #[test]
    fn test_category_default_is_others() {
        assert_eq!(Category::default(), Category::Others);
    }

    #[rstest]
    #[case("USD", true)]
    #[case("GBP", true)]
    #[case("usd", false)]
    #[case("Usd", false)]
    #[case("US", false)]
    #[case("USDD", false)]
    #[case("123", false)]
    #[case("ÉUR", false)]
    fn test_currency_code_shape(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(CurrencyCode::parse(input).is_some(), valid);
    }

    #[test]
    fn test_currency_code_default_is_usd() {
        assert_eq!(CurrencyCode::default().as_str(), "USD");
    }

    #[test]
    fn test_currency_code_deserialize_rejects_bad_shape() {
        assert!(serde_json::from_str::<CurrencyCode>("\"eur\"").is_err());
        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code.to_string(), "EUR");
    }
}
