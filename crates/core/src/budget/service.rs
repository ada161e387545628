//! Budget record service.

use std::sync::Arc;

use budgetly_shared::types::BudgetId;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use super::error::{BudgetError, ValidationErrors};
use super::types::{Budget, ValidatedBudget};
use super::validator::validate_budget;
use crate::clock::Clock;

/// Validates and stores budgets.
///
/// Records are kept in a process-local concurrent map; the service can be
/// shared between request handlers behind an `Arc`.
pub struct BudgetService {
    clock: Arc<dyn Clock>,
    budgets: DashMap<BudgetId, Budget>,
}

impl BudgetService {
    /// Creates an empty service that reads the current year from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            budgets: DashMap::new(),
        }
    }

    /// The year used as the lower bound for `year`.
    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.clock.current_year()
    }

    /// Validates a record without storing it.
    pub fn validate(&self, record: &Value) -> Result<ValidatedBudget, ValidationErrors> {
        let result = validate_budget(record, self.current_year());
        if let Err(errors) = &result {
            debug!(violations = errors.len(), "Budget input rejected");
        }
        result
    }

    /// Validates and stores a new budget.
    pub fn create(&self, record: &Value) -> Result<Budget, BudgetError> {
        let input = self.validate(record)?;
        let budget = Budget::from_validated(BudgetId::new(), input, Utc::now());
        self.budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    /// Returns all budgets, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self
            .budgets
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        budgets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        budgets
    }

    /// Looks up a budget by ID.
    pub fn get(&self, id: BudgetId) -> Result<Budget, BudgetError> {
        self.budgets
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(BudgetError::NotFound(id))
    }

    /// Replaces every field of an existing budget.
    ///
    /// The record is validated exactly like on creation; omitted optional
    /// fields fall back to their defaults rather than the stored values.
    pub fn update(&self, id: BudgetId, record: &Value) -> Result<Budget, BudgetError> {
        let mut entry = self.budgets.get_mut(&id).ok_or(BudgetError::NotFound(id))?;
        let input = self.validate(record)?;
        entry.apply(input, Utc::now());
        Ok(entry.value().clone())
    }

    /// Removes a budget.
    pub fn delete(&self, id: BudgetId) -> Result<(), BudgetError> {
        self.budgets
            .remove(&id)
            .map(|_| ())
            .ok_or(BudgetError::NotFound(id))
    }

    /// Number of stored budgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}

impl std::fmt::Debug for BudgetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetService")
            .field("current_year", &self.current_year())
            .field("budgets", &self.budgets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::Category;
    use crate::clock::FixedClock;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn service() -> BudgetService {
        BudgetService::new(Arc::new(FixedClock(2026)))
    }

    #[test]
    fn test_create_then_get() {
        let service = service();
        let created = service
            .create(&json!({ "category": "Food", "limit": 300, "month": 4, "year": 2026 }))
            .unwrap();

        let fetched = service.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.category, Category::Food);
        assert_eq!(fetched.currency.as_str(), "USD");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn test_create_invalid_stores_nothing() {
        let service = service();
        let result = service.create(&json!({ "limit": -5, "month": 4, "year": 2026 }));

        assert!(matches!(result, Err(BudgetError::Invalid(_))));
        assert!(service.is_empty());
    }

    #[test]
    fn test_create_uses_clock_for_year_bound() {
        let service = service();
        let result = service.create(&json!({ "limit": 5, "month": 4, "year": 2025 }));

        let Err(BudgetError::Invalid(errors)) = result else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.for_field("year").count(), 1);
    }

    #[test]
    fn test_list_returns_budgets_in_creation_order() {
        let service = service();
        let first = service.create(&json!({ "limit": 1, "month": 1, "year": 2026 })).unwrap();
        let second = service.create(&json!({ "limit": 2, "month": 2, "year": 2026 })).unwrap();
        let third = service.create(&json!({ "limit": 3, "month": 3, "year": 2026 })).unwrap();

        let ids: Vec<_> = service.list().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, [first.id, second.id, third.id]);
        assert_eq!(service.len(), 3);
    }

    #[test]
    fn test_list_breaks_timestamp_ties_by_id() {
        let service = service();
        let input = service
            .validate(&json!({ "limit": 1, "month": 1, "year": 2026 }))
            .unwrap();
        let now = Utc::now();
        let ids: Vec<_> = (1..=3u128)
            .map(|n| BudgetId::from_uuid(uuid::Uuid::from_u128(n)))
            .collect();

        for id in ids.iter().rev() {
            service
                .budgets
                .insert(*id, Budget::from_validated(*id, input.clone(), now));
        }
        let earlier = BudgetId::from_uuid(uuid::Uuid::from_u128(99));
        service.budgets.insert(
            earlier,
            Budget::from_validated(earlier, input, now - chrono::Duration::seconds(1)),
        );

        let listed: Vec<_> = service.list().into_iter().map(|b| b.id).collect();
        assert_eq!(listed, [earlier, ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_update_replaces_fields_and_keeps_identity() {
        let service = service();
        let created = service
            .create(&json!({
                "category": "Rent",
                "currency": "EUR",
                "limit": 900,
                "month": 1,
                "year": 2026
            }))
            .unwrap();

        let updated = service
            .update(created.id, &json!({ "limit": 950, "month": 2, "year": 2027 }))
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.category, Category::Others);
        assert_eq!(updated.currency.as_str(), "USD");
        assert_eq!(updated.limit, dec!(950));
        assert_eq!(service.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_invalid_keeps_existing() {
        let service = service();
        let created = service.create(&json!({ "limit": 10, "month": 5, "year": 2026 })).unwrap();

        let result = service.update(created.id, &json!({ "limit": 10, "month": 15, "year": 2026 }));

        assert!(matches!(result, Err(BudgetError::Invalid(_))));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_missing_budget_is_not_found() {
        let service = service();
        let id = BudgetId::new();

        assert!(matches!(service.get(id), Err(BudgetError::NotFound(missing)) if missing == id));
        assert!(matches!(
            service.update(id, &json!({ "limit": 1, "month": 1, "year": 2026 })),
            Err(BudgetError::NotFound(_))
        ));
        assert!(matches!(service.delete(id), Err(BudgetError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_budget() {
        let service = service();
        let created = service.create(&json!({ "limit": 10, "month": 5, "year": 2026 })).unwrap();

        service.delete(created.id).unwrap();

        assert!(service.is_empty());
        assert!(matches!(service.get(created.id), Err(BudgetError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_creates() {
        let service = Arc::new(service());
        let handles: Vec<_> = (1..=8)
            .map(|month| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    service
                        .create(&json!({ "limit": 100, "month": month, "year": 2026 }))
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(service.list().len(), 8);
    }
}
