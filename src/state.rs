use std::sync::Arc;

use campusdesk_config::{CalendarConfig, CorsConfig};
use campusdesk_db::PgPool;
use campusdesk_observability::PrometheusHandle;

use crate::modules::calendar::service::CalendarService;
use crate::sources::{
    AcademicRecords, InstituteHolidayStore, PgRecords, PortalHolidayFeed, PublicHolidayClient,
};

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn AcademicRecords>,
    pub holiday_store: Arc<dyn InstituteHolidayStore>,
    pub calendar: Arc<CalendarService>,
    pub calendar_config: CalendarConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("calendar", &self.calendar)
            .field("calendar_config", &self.calendar_config)
            .field("cors_config", &self.cors_config)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Wires the Postgres records and the public holiday API into the services.
pub fn init_app_state(db: PgPool, metrics: Option<PrometheusHandle>) -> anyhow::Result<AppState> {
    let calendar_config = CalendarConfig::from_env();
    let records = Arc::new(PgRecords::new(db));
    let public_holidays = Arc::new(PublicHolidayClient::from_config(&calendar_config)?);

    let feed = PortalHolidayFeed::new(public_holidays, records.clone(), records.clone());
    let calendar = CalendarService::new(Arc::new(feed), &calendar_config);

    Ok(AppState {
        records: records.clone(),
        holiday_store: records,
        calendar: Arc::new(calendar),
        calendar_config,
        cors_config: CorsConfig::from_env(),
        metrics,
    })
}
