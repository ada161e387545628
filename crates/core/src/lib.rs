//! Core business logic for Budgetly.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! All domain types, validation rules, and record handling live here.
//!
//! # Modules
//!
//! - `budget` - Budget input validation and the budget record store
//! - `clock` - Source of the current calendar year

pub mod budget;
pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
