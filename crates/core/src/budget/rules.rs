//! Field rules for budget input.
//!
//! Each rule inspects one field of the untyped record and either produces the
//! normalized value for that field or a [`FieldError`]. Rules never look at
//! other fields, so they can all run on the same record and their failures
//! can be reported together.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

use super::error::{FieldError, FieldErrorKind};
use super::types::{Category, CurrencyCode};

/// Message reported for a malformed currency code.
pub const CURRENCY_PATTERN_MESSAGE: &str =
    "Currency must be a valid 3-letter currency code (e.g. USD, GBP, JPY)";

/// Inclusive upper bound for `limit`.
pub const MAX_LIMIT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Inputs a rule may depend on besides the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    /// Lowest acceptable `year`.
    pub current_year: i32,
}

/// Normalized value produced by a successful rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Output of the `category` rule.
    Category(Category),
    /// Output of the `currency` rule.
    Currency(CurrencyCode),
    /// Output of the `limit` rule.
    Limit(Decimal),
    /// Output of the `month` rule.
    Month(u8),
    /// Output of the `year` rule.
    Year(i32),
}

/// Signature shared by all field rules.
pub type RuleFn = fn(&Map<String, Value>, &RuleContext) -> Result<FieldValue, FieldError>;

/// A named field rule.
#[derive(Clone, Copy)]
pub struct FieldRule {
    /// Field the rule validates.
    pub field: &'static str,
    /// The check itself.
    pub check: RuleFn,
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule").field("field", &self.field).finish()
    }
}

/// Budget field rules, in reporting order.
pub const RULES: [FieldRule; 5] = [
    FieldRule {
        field: "category",
        check: category,
    },
    FieldRule {
        field: "currency",
        check: currency,
    },
    FieldRule {
        field: "limit",
        check: limit,
    },
    FieldRule {
        field: "month",
        check: month,
    },
    FieldRule {
        field: "year",
        check: year,
    },
];

/// Returns true if `key` names a budget field.
pub fn is_known_field(key: &str) -> bool {
    RULES.iter().any(|rule| rule.field == key)
}

/// `category`: optional, trimmed, one of [`Category::ALL`].
pub fn category(record: &Map<String, Value>, _ctx: &RuleContext) -> Result<FieldValue, FieldError> {
    const FIELD: &str = "category";

    let Some(value) = record.get(FIELD) else {
        return Ok(FieldValue::Category(Category::default()));
    };
    let Value::String(raw) = value else {
        return Err(type_error(FIELD, "string"));
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(
            FIELD,
            FieldErrorKind::Enum,
            format!("\"{FIELD}\" is not allowed to be empty"),
        ));
    }

    trimmed.parse().map(FieldValue::Category).map_err(|_| {
        let allowed = Category::ALL.map(Category::as_str).join(", ");
        FieldError::new(
            FIELD,
            FieldErrorKind::Enum,
            format!("\"{FIELD}\" must be one of [{allowed}]"),
        )
    })
}

/// `currency`: optional, exactly three uppercase ASCII letters.
pub fn currency(record: &Map<String, Value>, _ctx: &RuleContext) -> Result<FieldValue, FieldError> {
    const FIELD: &str = "currency";

    match record.get(FIELD) {
        None => Ok(FieldValue::Currency(CurrencyCode::default())),
        Some(Value::String(raw)) => CurrencyCode::parse(raw)
            .map(FieldValue::Currency)
            .ok_or_else(|| {
                FieldError::new(FIELD, FieldErrorKind::Pattern, CURRENCY_PATTERN_MESSAGE)
            }),
        Some(_) => Err(type_error(FIELD, "string")),
    }
}

/// `limit`: required number in `[0, 1_000_000]`.
pub fn limit(record: &Map<String, Value>, _ctx: &RuleContext) -> Result<FieldValue, FieldError> {
    const FIELD: &str = "limit";

    let amount = required_number(record, FIELD)?;
    check_min(FIELD, amount, Decimal::ZERO)?;
    check_max(FIELD, amount, MAX_LIMIT)?;
    Ok(FieldValue::Limit(amount))
}

/// `month`: required integer in `[1, 12]`.
pub fn month(record: &Map<String, Value>, _ctx: &RuleContext) -> Result<FieldValue, FieldError> {
    const FIELD: &str = "month";

    let value = required_number(record, FIELD)?;
    check_integer(FIELD, value)?;
    check_min(FIELD, value, Decimal::ONE)?;
    check_max(FIELD, value, Decimal::from(12))?;
    value
        .to_u8()
        .map(FieldValue::Month)
        .ok_or_else(|| unsafe_number(FIELD))
}

/// `year`: required integer no earlier than [`RuleContext::current_year`].
pub fn year(record: &Map<String, Value>, ctx: &RuleContext) -> Result<FieldValue, FieldError> {
    const FIELD: &str = "year";

    let value = required_number(record, FIELD)?;
    check_integer(FIELD, value)?;
    check_min(FIELD, value, Decimal::from(ctx.current_year))?;
    value
        .to_i32()
        .map(FieldValue::Year)
        .ok_or_else(|| unsafe_number(FIELD))
}

fn required_number(record: &Map<String, Value>, field: &str) -> Result<Decimal, FieldError> {
    match record.get(field) {
        None => Err(FieldError::new(
            field,
            FieldErrorKind::Required,
            format!("\"{field}\" is required"),
        )),
        Some(Value::Number(n)) => to_decimal(n).ok_or_else(|| unsafe_number(field)),
        Some(_) => Err(type_error(field, "number")),
    }
}

/// Converts a JSON number to `Decimal` without rounding.
///
/// Fractional numbers are read from their shortest round-trip text, which is
/// what the caller wrote. Anything `Decimal` cannot hold exactly is `None`.
fn to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn check_integer(field: &str, value: Decimal) -> Result<(), FieldError> {
    if value.fract().is_zero() {
        Ok(())
    } else {
        Err(FieldError::new(
            field,
            FieldErrorKind::Type,
            format!("\"{field}\" must be an integer"),
        ))
    }
}

fn check_min(field: &str, value: Decimal, min: Decimal) -> Result<(), FieldError> {
    if value < min {
        return Err(FieldError::new(
            field,
            FieldErrorKind::Range,
            format!("\"{field}\" must be greater than or equal to {min}"),
        ));
    }
    Ok(())
}

fn check_max(field: &str, value: Decimal, max: Decimal) -> Result<(), FieldError> {
    if value > max {
        return Err(FieldError::new(
            field,
            FieldErrorKind::Range,
            format!("\"{field}\" must be less than or equal to {max}"),
        ));
    }
    Ok(())
}

fn type_error(field: &str, expected: &str) -> FieldError {
    FieldError::new(
        field,
        FieldErrorKind::Type,
        format!("\"{field}\" must be a {expected}"),
    )
}

fn unsafe_number(field: &str) -> FieldError {
    FieldError::new(
        field,
        FieldErrorKind::Range,
        format!("\"{field}\" must be a safe number"),
    )
}
