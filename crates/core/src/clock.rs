//! Source of the current calendar year.
//!
//! The `year` lower bound of a budget moves with the calendar, so the
//! validator takes the year as a parameter and callers obtain it from a
//! [`Clock`].

use chrono::{Datelike, Utc};

/// Provides the current calendar year.
pub trait Clock: Send + Sync {
    /// Returns the current calendar year.
    fn current_year(&self) -> i32;
}

/// Reads the year from the system clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Utc::now().year()
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
