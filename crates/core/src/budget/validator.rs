//! Budget input validation.
//!
//! Runs every field rule against the record and reports all violations at
//! once. The year bound is passed in by the caller, which keeps validation
//! deterministic for a given input and year.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::error::{FieldError, FieldErrorKind, ValidationErrors};
use super::rules::{FieldValue, RULES, RuleContext, is_known_field};
use super::types::{Category, CurrencyCode, ValidatedBudget};

/// Validates an untrusted budget record.
///
/// On success the returned budget has `category` and `currency` defaulted
/// when they were absent. On failure the errors appear in field order
/// (`category`, `currency`, `limit`, `month`, `year`), followed by any keys
/// that are not budget fields.
pub fn validate_budget(
    record: &Value,
    current_year: i32,
) -> Result<ValidatedBudget, ValidationErrors> {
    let Value::Object(fields) = record else {
        return Err(ValidationErrors::new(vec![FieldError::new(
            "value",
            FieldErrorKind::Type,
            "\"value\" must be of type object",
        )]));
    };
    validate_fields(fields, &RuleContext { current_year })
}

fn validate_fields(
    fields: &Map<String, Value>,
    ctx: &RuleContext,
) -> Result<ValidatedBudget, ValidationErrors> {
    let mut draft = Draft::default();
    let mut errors = Vec::new();

    for rule in &RULES {
        match (rule.check)(fields, ctx) {
            Ok(value) => draft.set(value),
            Err(error) => errors.push(error),
        }
    }

    for key in fields.keys().filter(|key| !is_known_field(key)) {
        errors.push(FieldError::new(
            key.as_str(),
            FieldErrorKind::Unknown,
            format!("\"{key}\" is not allowed"),
        ));
    }

    match draft.finish() {
        Some(budget) if errors.is_empty() => Ok(budget),
        _ => Err(ValidationErrors::new(errors)),
    }
}

/// Values accumulated from successful rules.
#[derive(Default)]
struct Draft {
    category: Option<Category>,
    currency: Option<CurrencyCode>,
    limit: Option<Decimal>,
    month: Option<u8>,
    year: Option<i32>,
}

impl Draft {
    fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::Category(v) => self.category = Some(v),
            FieldValue::Currency(v) => self.currency = Some(v),
            FieldValue::Limit(v) => self.limit = Some(v),
            FieldValue::Month(v) => self.month = Some(v),
            FieldValue::Year(v) => self.year = Some(v),
        }
    }

    fn finish(self) -> Option<ValidatedBudget> {
        Some(ValidatedBudget {
            category: self.category?,
            currency: self.currency?,
            limit: self.limit?,
            month: self.month?,
            year: self.year?,
        })
    }
}
