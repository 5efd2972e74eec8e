//! Calendar data models.
//!
//! Re-exports the calendar models from `campusdesk-models` and adds the
//! request/response types of the calendar endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub use campusdesk_models::calendar::*;

/// Query parameters for a month view.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Bypass the cache and refetch the month
    #[serde(default)]
    pub force: bool,
    /// Serve a Sundays-only month when the holiday feed fails (default: true)
    pub fallback: Option<bool>,
}

impl CalendarQuery {
    pub fn fallback_enabled(&self) -> bool {
        self.fallback.unwrap_or(true)
    }
}

/// Month snapshot plus its rendered grid.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarMonthView {
    pub data: CalendarMonthData,
    pub cells: Vec<CalendarCell>,
}

/// Cache lifecycle of one month.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthStateResponse {
    pub month: MonthKey,
    /// One of `unfetched`, `loading`, `ready`, `error`
    pub state: String,
    /// Failure message when `state` is `error`
    pub error: Option<String>,
}
