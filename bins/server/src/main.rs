//! Budgetly API Server
//!
//! Main entry point for the Budgetly backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetly_api::{AppState, create_router};
use budgetly_core::{Clock, FixedClock, SystemClock};
use budgetly_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetly=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    let clock: Arc<dyn Clock> = match config.budget.fixed_year {
        Some(year) => {
            info!(year, "Budget year bound pinned by configuration");
            Arc::new(FixedClock(year))
        }
        None => Arc::new(SystemClock),
    };

    // Create router
    let app = create_router(AppState::new(clock));

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
