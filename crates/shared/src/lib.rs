//! Shared types, errors, and configuration for Budgetly.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use self::config::{AppConfig, BudgetConfig, ServerConfig};
pub use error::AppError;
