//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for budgets
//! - Health check
//! - JSON error responses

pub mod routes;

use std::sync::Arc;

use axum::Router;
use budgetly_core::{Clock, budget::BudgetService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Budget validation and storage.
    pub budgets: Arc<BudgetService>,
}

impl AppState {
    /// Creates state with an empty budget store reading the year from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            budgets: Arc::new(BudgetService::new(clock)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
