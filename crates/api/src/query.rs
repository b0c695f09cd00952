//! Shared query parameter types for API handlers.

use serde::Deserialize;
use slate_core::types::Day;

/// `?days=N` for series endpoints. Validated in the handler.
#[derive(Debug, Deserialize)]
pub struct DaysParams {
    pub days: Option<u32>,
}

impl DaysParams {
    pub fn days_or(&self, default: u32) -> u32 {
        self.days.unwrap_or(default)
    }
}

/// Inclusive `?from=&to=` date filter.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<Day>,
    pub to: Option<Day>,
}
