//! Budget management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use budgetly_core::budget::{BudgetError, Category, ValidationErrors};
use budgetly_shared::{AppError, types::BudgetId};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::AppState;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/categories", get(list_categories))
        .route("/budgets/validate", post(validate_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Renders an `AppError` as a JSON error response.
fn error_response(error: &AppError, details: Option<&ValidationErrors>) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = json!({
        "error": error.error_code(),
        "message": error.message(),
    });
    if let Some(details) = details {
        body["details"] = json!(details);
    }
    (status, Json(body)).into_response()
}

fn validation_failed(errors: &ValidationErrors) -> Response {
    warn!(violations = errors.len(), "Budget validation failed");
    error_response(
        &AppError::Validation("Budget validation failed".to_string()),
        Some(errors),
    )
}

/// Maps service errors to HTTP responses.
fn map_budget_error(error: &BudgetError) -> Response {
    match error {
        BudgetError::NotFound(id) => {
            error_response(&AppError::NotFound(format!("Budget {id} not found")), None)
        }
        BudgetError::Invalid(errors) => validation_failed(errors),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/budgets` - List all budgets.
async fn list_budgets(State(state): State<AppState>) -> impl IntoResponse {
    let budgets = state.budgets.list();
    (StatusCode::OK, Json(json!({ "budgets": budgets })))
}

/// GET `/budgets/categories` - Allowed categories and the default.
async fn list_categories() -> impl IntoResponse {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    Json(json!({
        "categories": categories,
        "default": Category::default().as_str(),
    }))
}

/// POST `/budgets/validate` - Validate a budget without storing it.
async fn validate_budget(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Response {
    match state.budgets.validate(&payload) {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(errors) => validation_failed(&errors),
    }
}

/// POST `/budgets` - Create a new budget.
async fn create_budget(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    match state.budgets.create(&payload) {
        Ok(budget) => {
            info!(
                budget_id = %budget.id,
                category = %budget.category,
                currency = %budget.currency,
                "Budget created"
            );
            (StatusCode::CREATED, Json(budget)).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// GET `/budgets/{budget_id}` - Get a single budget.
async fn get_budget(State(state): State<AppState>, Path(budget_id): Path<BudgetId>) -> Response {
    match state.budgets.get(budget_id) {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

/// PUT `/budgets/{budget_id}` - Replace a budget.
async fn update_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<BudgetId>,
    Json(payload): Json<Value>,
) -> Response {
    match state.budgets.update(budget_id, &payload) {
        Ok(budget) => {
            info!(budget_id = %budget.id, "Budget updated");
            (StatusCode::OK, Json(budget)).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// DELETE `/budgets/{budget_id}` - Delete a budget.
async fn delete_budget(State(state): State<AppState>, Path(budget_id): Path<BudgetId>) -> Response {
    match state.budgets.delete(budget_id) {
        Ok(()) => {
            info!(budget_id = %budget_id, "Budget deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}
