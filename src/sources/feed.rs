use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use tracing::instrument;

use campusdesk_models::calendar::{AttendanceStatus, HolidayMonthPayload, MonthKey};

use super::{
    AttendanceLedger, HolidayFeed, InstituteHolidayStore, PublicHolidaySource, SourceError,
};

/// Attendance status for every day of `month`.
///
/// A day with a submission is `Submitted`; otherwise it is `Upcoming` after
/// `today`, `Pending` on `today` and `NotMarked` before it.
pub fn derive_attendance_status(
    month: MonthKey,
    submitted: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> HashMap<NaiveDate, AttendanceStatus> {
    month
        .days()
        .map(|day| {
            let status = if submitted.contains(&day) {
                AttendanceStatus::Submitted
            } else if day > today {
                AttendanceStatus::Upcoming
            } else if day == today {
                AttendanceStatus::Pending
            } else {
                AttendanceStatus::NotMarked
            };
            (day, status)
        })
        .collect()
}

/// [`HolidayFeed`] composed from the portal's own collaborators.
pub struct PortalHolidayFeed {
    public_holidays: Arc<dyn PublicHolidaySource>,
    institute_holidays: Arc<dyn InstituteHolidayStore>,
    attendance: Arc<dyn AttendanceLedger>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl PortalHolidayFeed {
    pub fn new(
        public_holidays: Arc<dyn PublicHolidaySource>,
        institute_holidays: Arc<dyn InstituteHolidayStore>,
        attendance: Arc<dyn AttendanceLedger>,
    ) -> Self {
        Self {
            public_holidays,
            institute_holidays,
            attendance,
            today: local_today,
        }
    }

    /// Overrides the reference date used for attendance status.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[async_trait]
impl HolidayFeed for PortalHolidayFeed {
    #[instrument(skip(self))]
    async fn fetch_holiday_month(
        &self,
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
    ) -> Result<HolidayMonthPayload, SourceError> {
        let (public_holidays, custom_holidays, submitted) = tokio::try_join!(
            self.public_holidays
                .public_holidays(month, country_code, region_code),
            self.institute_holidays.list_institute_holidays(month),
            self.attendance.submitted_dates(month),
        )?;

        let attendance_status = derive_attendance_status(month, &submitted, (self.today)())
            .into_iter()
            .map(|(day, status)| (day.to_string(), status))
            .collect();

        Ok(HolidayMonthPayload {
            month: Some(month.to_string()),
            country_code: Some(country_code.to_string()),
            region_code: region_code.map(str::to_string),
            sundays: None,
            public_holidays: Some(public_holidays),
            custom_holidays: Some(custom_holidays),
            attendance_status: Some(attendance_status),
            fetched_at: Some(Utc::now()),
            from_cache: Some(false),
        })
    }
}
