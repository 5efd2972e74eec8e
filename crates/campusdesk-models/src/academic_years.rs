//! Academic year models and label handling.
//!
//! An academic year is a one-year session labelled `"YYYY-YYYY"`. Labels
//! entered by administrators are not always canonical (`"2025"` is common),
//! so every comparison goes through [`normalize_year_label`].
//!
//! The batch helpers never fail: malformed input yields `None`, which callers
//! treat as "cannot compute yet" rather than as an error.

use std::sync::LazyLock;

use crate::ids::AcademicYearId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

static RANGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{4})$").expect("academic year range pattern is valid")
});

static SINGLE_YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("single year pattern is valid"));

/// Canonicalizes an academic-year label.
///
/// - `"2025-2026"` is returned unchanged
/// - `"2025"` expands to `"2025-2026"`
/// - any other non-empty input is returned unchanged (non-conforming)
/// - empty or absent input yields `None`
pub fn normalize_year_label(label: Option<&str>) -> Option<String> {
    let label = label?;
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }

    if RANGE_LABEL.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    if let Some(start) = SINGLE_YEAR_LABEL
        .captures(trimmed)
        .and_then(|caps| caps[1].parse::<i32>().ok())
    {
        return Some(year_label(start));
    }

    Some(label.to_string())
}

/// Derives the admission batch from an academic-year label and year of study.
///
/// `batch = start_year - year_of_study + 1`, so a second-year student in
/// `"2025-2026"` belongs to batch `"2024"`. This assumes "Year 1" begins in
/// the academic year matching the label's start year.
pub fn derive_batch(
    academic_year_label: Option<&str>,
    year_of_study: Option<i32>,
) -> Option<String> {
    let year_of_study = year_of_study.filter(|y| *y >= 1)?;

    let cleaned: String = academic_year_label?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let start_year = RANGE_LABEL
        .captures(&cleaned)
        .or_else(|| SINGLE_YEAR_LABEL.captures(&cleaned))
        .and_then(|caps| caps[1].parse::<i32>().ok())?;

    Some((start_year - year_of_study + 1).to_string())
}

/// Builds the canonical label for the academic year starting in `start_year`.
pub fn year_label(start_year: i32) -> String {
    format!("{}-{}", start_year, start_year + 1)
}

/// Academic year as seen by term pickers.
///
/// Either backed by a persisted record (`exists_in_db = true`, `id` set) or
/// synthesized for the sliding window until an administrator saves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AcademicYear {
    /// Persisted record ID; `None` for synthetic years
    pub id: Option<AcademicYearId>,
    /// Canonical `"YYYY-YYYY"` label
    pub year_label: String,
    pub start_year: i32,
    pub end_year: i32,
    pub is_active: bool,
    /// Whether the year exists in the records store
    pub exists_in_db: bool,
}

impl AcademicYear {
    /// A year that only exists in the generated window.
    pub fn synthetic(start_year: i32) -> Self {
        Self {
            id: None,
            year_label: year_label(start_year),
            start_year,
            end_year: start_year + 1,
            is_active: true,
            exists_in_db: false,
        }
    }

    /// Merges a persisted record into the generated year, keeping the
    /// generated label and bounds.
    pub fn with_persisted(start_year: i32, persisted: &PersistedAcademicYear) -> Self {
        Self {
            id: Some(persisted.id),
            is_active: persisted.is_active,
            exists_in_db: true,
            ..Self::synthetic(start_year)
        }
    }
}

/// Academic year row as stored by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PersistedAcademicYear {
    pub id: AcademicYearId,
    /// Label as entered; may be `"YYYY"` or `"YYYY-YYYY"`
    pub year_label: String,
    pub is_active: bool,
}

impl PersistedAcademicYear {
    pub fn normalized_label(&self) -> Option<String> {
        normalize_year_label(Some(&self.year_label))
    }
}
