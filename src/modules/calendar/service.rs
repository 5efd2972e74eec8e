use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use campusdesk_cache::{CacheStatus, MonthCache, MonthState, keys};
use campusdesk_config::CalendarConfig;
use campusdesk_core::AppError;
use campusdesk_models::calendar::{
    CalendarMonthData, CreateInstituteHolidayDto, InstituteHoliday, MonthKey,
};
use campusdesk_observability::{
    track_calendar_cache_hit, track_calendar_cache_miss, track_calendar_fallback,
    track_calendar_feed_failure,
};

use crate::sources::{HolidayFeed, InstituteHolidayStore, SourceError};

/// Month snapshot together with how it was obtained.
#[derive(Debug, Clone)]
pub struct MonthLookup {
    pub data: Arc<CalendarMonthData>,
    pub status: CacheStatus,
}

/// Owns the per-month calendar cache and the holiday feed behind it.
///
/// Snapshots are served from the cache until a forced fetch replaces them;
/// they never expire on their own.
pub struct CalendarService {
    feed: Arc<dyn HolidayFeed>,
    cache: MonthCache<CalendarMonthData>,
    country_code: String,
    region_code: Option<String>,
}

impl std::fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarService")
            .field("country_code", &self.country_code)
            .field("region_code", &self.region_code)
            .finish_non_exhaustive()
    }
}

impl CalendarService {
    pub fn new(feed: Arc<dyn HolidayFeed>, config: &CalendarConfig) -> Self {
        Self {
            feed,
            cache: MonthCache::new(),
            country_code: config.country_code.clone(),
            region_code: config.region_code.clone(),
        }
    }

    fn cache_key(&self, month: MonthKey) -> String {
        keys::calendar::month_for_region(month, &self.country_code, self.region_code.as_deref())
    }

    /// Cached snapshot for `month`, or a fresh one from the feed when forced
    /// or not yet cached.
    #[instrument(skip(self), fields(month = %month))]
    pub async fn lookup(&self, month: MonthKey, force: bool) -> Result<MonthLookup, AppError> {
        let key = self.cache_key(month);

        if !force && let Some(data) = self.cache.get(&key)? {
            track_calendar_cache_hit();
            debug!("Calendar cache hit");
            return Ok(MonthLookup {
                data,
                status: CacheStatus::Hit,
            });
        }

        track_calendar_cache_miss();
        self.cache.begin_loading(&key)?;

        match self.fetch_from_feed(month).await {
            Ok(data) => {
                let data = self.cache.store(&key, data)?;
                debug!(
                    public_holidays = data.public_holidays.len(),
                    custom_holidays = data.custom_holidays.len(),
                    "Calendar month cached"
                );
                Ok(MonthLookup {
                    data,
                    status: CacheStatus::Miss,
                })
            }
            Err(e) => {
                warn!(error = %e, "Holiday feed failed");
                track_calendar_feed_failure(e.reason());
                self.cache.fail(&key, e.to_string())?;
                Err(e.into_app_error())
            }
        }
    }

    async fn fetch_from_feed(&self, month: MonthKey) -> Result<CalendarMonthData, SourceError> {
        let region = self.region_code.as_deref();
        let payload = self
            .feed
            .fetch_holiday_month(month, &self.country_code, region)
            .await?;

        if let Some(reported) = payload.month.as_deref()
            && reported != month.to_string()
        {
            return Err(SourceError::InvalidData(format!(
                "Feed returned month {reported} for {month}"
            )));
        }

        Ok(payload.into_month_data(month, &self.country_code, region, Utc::now()))
    }

    /// Snapshot for `month`; the same `Arc` is returned while it stays cached.
    pub async fn get(
        &self,
        month: MonthKey,
        force: bool,
    ) -> Result<Arc<CalendarMonthData>, AppError> {
        self.lookup(month, force).await.map(|lookup| lookup.data)
    }

    /// Sundays-only month used when the feed is unavailable.
    pub fn fallback(&self, month: MonthKey) -> CalendarMonthData {
        CalendarMonthData::fallback(
            month,
            &self.country_code,
            self.region_code.as_deref(),
            Utc::now(),
        )
    }

    /// Like [`lookup`](Self::lookup) but degrades to [`fallback`](Self::fallback)
    /// on failure. The fallback is not cached, so the next call retries the feed.
    pub async fn get_or_fallback(&self, month: MonthKey, force: bool) -> MonthLookup {
        match self.lookup(month, force).await {
            Ok(lookup) => lookup,
            Err(e) => {
                track_calendar_fallback();
                info!(month = %month, error = %e.error, "Serving fallback calendar month");
                MonthLookup {
                    data: Arc::new(self.fallback(month)),
                    status: CacheStatus::Fallback,
                }
            }
        }
    }

    pub fn state(&self, month: MonthKey) -> Result<MonthState, AppError> {
        Ok(self.cache.state(&self.cache_key(month))?)
    }

    /// Declares an institute holiday and refreshes the month it falls in.
    #[instrument(skip(self, store))]
    pub async fn create_institute_holiday(
        &self,
        store: &dyn InstituteHolidayStore,
        dto: CreateInstituteHolidayDto,
    ) -> Result<InstituteHoliday, AppError> {
        let holiday = store
            .create_institute_holiday(&dto)
            .await
            .map_err(SourceError::into_app_error)?;

        self.refresh_after_change(MonthKey::containing(holiday.date)).await;
        Ok(holiday)
    }

    /// Removes an institute holiday and refreshes the month it fell in.
    #[instrument(skip(self, store))]
    pub async fn delete_institute_holiday(
        &self,
        store: &dyn InstituteHolidayStore,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        store
            .delete_institute_holiday(date)
            .await
            .map_err(SourceError::into_app_error)?;

        self.refresh_after_change(MonthKey::containing(date)).await;
        Ok(())
    }

    /// Forced refetch after a write. The write already succeeded, so a feed
    /// failure only leaves the month in `Error` for the next read to retry.
    async fn refresh_after_change(&self, month: MonthKey) {
        if let Err(e) = self.lookup(month, true).await {
            warn!(month = %month, error = %e.error, "Calendar refresh after holiday change failed");
        }
    }
}
