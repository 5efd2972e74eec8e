//! Day classification and month grid layout.
//!
//! Both functions are pure over an immutable [`CalendarMonthData`] snapshot.

use chrono::{Datelike, Days, NaiveDate, Utc};

use campusdesk_models::calendar::{CalendarCell, CalendarMonthData, DayClassification, MonthKey};

/// Single authoritative classification of `date`.
///
/// Precedence: public holiday, institute holiday, Sunday, attendance status,
/// working day. Matching is by calendar date only.
pub fn classify_day(date: NaiveDate, data: &CalendarMonthData) -> DayClassification {
    if data.public_holiday_on(date).is_some() {
        DayClassification::PublicHoliday
    } else if data.institute_holiday_on(date).is_some() {
        DayClassification::InstituteHoliday
    } else if data.is_sunday(date) {
        DayClassification::Sunday
    } else if let Some(status) = data.attendance_on(date) {
        DayClassification::Attendance(status)
    } else {
        DayClassification::WorkingDay
    }
}

/// Display name for holiday cells.
fn holiday_label(
    date: NaiveDate,
    classification: DayClassification,
    data: &CalendarMonthData,
) -> Option<String> {
    match classification {
        DayClassification::PublicHoliday => {
            data.public_holiday_on(date).map(|h| h.local_name.clone())
        }
        DayClassification::InstituteHoliday => {
            data.institute_holiday_on(date).map(|h| h.title.clone())
        }
        _ => None,
    }
}

/// Complete weeks (Sunday first) covering `month`.
///
/// The grid length is the smallest multiple of 7 that fits the leading
/// offset plus the days of the month. Leading and trailing cells from the
/// adjacent months carry real dates and are classified against the same
/// snapshot, with their Sundays recognised by weekday. Without a snapshot,
/// cells are classified from computed Sundays.
pub fn build_month_matrix(
    month: MonthKey,
    data: Option<&CalendarMonthData>,
) -> Vec<CalendarCell> {
    let computed;
    let data = match data {
        Some(data) => data,
        None => {
            computed = CalendarMonthData::fallback(month, "", None, Utc::now());
            &computed
        }
    };

    let first = month.first_day();
    let offset = u64::from(first.weekday().num_days_from_sunday());
    let span = offset + u64::from(month.days_in_month());
    let len = span.div_ceil(7) * 7;

    let Some(start) = first.checked_sub_days(Days::new(offset)) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take(len as usize)
        .map(|date| {
            let classification = classify_day(date, data);
            CalendarCell {
                date,
                is_current_month: month.contains(date),
                label: holiday_label(date, classification, data),
                classification,
            }
        })
        .collect()
}
