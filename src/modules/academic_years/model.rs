//! Academic year data models.
//!
//! Re-exports academic year models from the `campusdesk-models` crate and
//! adds the window query.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

pub use campusdesk_models::academic_years::*;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    /// Reference date (defaults to today)
    pub today: Option<NaiveDate>,
}
