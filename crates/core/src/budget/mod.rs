//! Budget input validation and budget records.

pub mod error;
pub mod rules;
pub mod service;
pub mod types;
pub mod validator;


pub use error::{BudgetError, FieldError, FieldErrorKind, ValidationErrors};
pub use rules::{CURRENCY_PATTERN_MESSAGE, MAX_LIMIT, RuleContext};
pub use service::BudgetService;
pub use types::{Budget, Category, CurrencyCode, ValidatedBudget};
pub use validator::validate_budget;
