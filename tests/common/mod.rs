#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;

use campusdesk::modules::calendar::service::CalendarService;
use campusdesk::router::init_router;
use campusdesk::sources::{AcademicRecords, HolidayFeed, InstituteHolidayStore, SourceError};
use campusdesk::state::AppState;
use campusdesk_config::{CalendarConfig, CorsConfig};
use campusdesk_models::calendar::{
    CreateInstituteHolidayDto, HolidayMonthPayload, InstituteHoliday, MonthKey, PublicHoliday,
};
use campusdesk_models::courses::{Course, YearSemesterConfig};
use campusdesk_models::ids::{AcademicYearId, CollegeId, CourseId, TermId};
use campusdesk_models::{
    CreateTermDto, PersistedAcademicYear, Term, TermFilterParams, normalize_year_label,
};

pub const COLLEGE: CollegeId = CollegeId::from_u128(1);
pub const BTECH: CourseId = CourseId::from_u128(10);
pub const DIPLOMA: CourseId = CourseId::from_u128(11);
pub const YEAR_2026: AcademicYearId = AcademicYearId::from_u128(100);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory institute holidays keyed by date (last write wins).
#[derive(Default)]
pub struct StubHolidayStore {
    holidays: Mutex<BTreeMap<NaiveDate, InstituteHoliday>>,
}

impl StubHolidayStore {
    pub fn in_month(&self, month: MonthKey) -> Vec<InstituteHoliday> {
        self.holidays
            .lock()
            .unwrap()
            .values()
            .filter(|h| month.contains(h.date))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InstituteHolidayStore for StubHolidayStore {
    async fn list_institute_holidays(
        &self,
        month: MonthKey,
    ) -> Result<Vec<InstituteHoliday>, SourceError> {
        Ok(self.in_month(month))
    }

    async fn create_institute_holiday(
        &self,
        dto: &CreateInstituteHolidayDto,
    ) -> Result<InstituteHoliday, SourceError> {
        let holiday = InstituteHoliday {
            date: dto.date,
            title: dto.title.trim().to_string(),
            description: dto.description.clone(),
        };
        self.holidays
            .lock()
            .unwrap()
            .insert(holiday.date, holiday.clone());
        Ok(holiday)
    }

    async fn delete_institute_holiday(&self, date: NaiveDate) -> Result<(), SourceError> {
        self.holidays.lock().unwrap().remove(&date);
        Ok(())
    }
}

/// Holiday feed that counts its calls and can be switched to failing.
///
/// October 2026 carries Gandhi Jayanti on the 2nd; institute holidays come
/// from the shared store.
pub struct StubFeed {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
    store: Arc<StubHolidayStore>,
}

impl StubFeed {
    pub fn new(store: Arc<StubHolidayStore>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            store,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl HolidayFeed for StubFeed {
    async fn fetch_holiday_month(
        &self,
        month: MonthKey,
        _country_code: &str,
        _region_code: Option<&str>,
    ) -> Result<HolidayMonthPayload, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Status { status: 503 });
        }

        let public_holidays = if month == MonthKey::new(2026, 10).unwrap() {
            vec![PublicHoliday {
                date: date(2026, 10, 2),
                name: "Gandhi Jayanti".to_string(),
                local_name: "Gandhi Jayanti".to_string(),
            }]
        } else {
            Vec::new()
        };

        Ok(HolidayMonthPayload {
            month: Some(month.to_string()),
            public_holidays: Some(public_holidays),
            custom_holidays: Some(self.store.in_month(month)),
            ..Default::default()
        })
    }
}

/// In-memory academic records.
pub struct StubRecords {
    pub courses: Vec<Course>,
    pub years: Vec<PersistedAcademicYear>,
    pub terms: Mutex<Vec<Term>>,
}

impl Default for StubRecords {
    fn default() -> Self {
        Self {
            courses: vec![
                Course {
                    id: BTECH,
                    college_id: COLLEGE,
                    name: "B.Tech".to_string(),
                    code: Some("BT".to_string()),
                    total_years: 4,
                    semesters_per_year: Some(2),
                    year_semester_config: None,
                },
                Course {
                    id: DIPLOMA,
                    college_id: COLLEGE,
                    name: "Diploma".to_string(),
                    code: None,
                    total_years: 3,
                    semesters_per_year: None,
                    year_semester_config: Some(vec![
                        YearSemesterConfig { year: 1, semesters: 1 },
                        YearSemesterConfig { year: 2, semesters: 2 },
                    ]),
                },
            ],
            years: vec![PersistedAcademicYear {
                id: YEAR_2026,
                year_label: "2026".to_string(),
                is_active: true,
            }],
            terms: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AcademicRecords for StubRecords {
    async fn list_persisted_academic_years(
        &self,
    ) -> Result<Vec<PersistedAcademicYear>, SourceError> {
        Ok(self.years.clone())
    }

    async fn list_courses(
        &self,
        college_id: Option<CollegeId>,
    ) -> Result<Vec<Course>, SourceError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| college_id.is_none_or(|id| c.college_id == id))
            .cloned()
            .collect())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, SourceError> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_terms(&self, filters: &TermFilterParams) -> Result<Vec<Term>, SourceError> {
        Ok(self
            .terms
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filters.course_id().is_none_or(|id| t.course_id == id))
            .filter(|t| filters.year_of_study.is_none_or(|y| t.year_of_study == y))
            .cloned()
            .collect())
    }

    async fn create_term(&self, dto: &CreateTermDto) -> Result<Term, SourceError> {
        let term = Term {
            id: TermId::new(),
            college_id: dto.college_id,
            course_id: dto.course_id,
            batch_label: dto.batch_label.clone(),
            academic_year_id: dto.academic_year_id,
            academic_year_label: normalize_year_label(dto.academic_year_label.as_deref()),
            year_of_study: dto.year_of_study,
            semester_number: dto.semester_number,
            start_date: dto.start_date,
            end_date: dto.end_date,
        };
        self.terms.lock().unwrap().push(term.clone());
        Ok(term)
    }
}

pub struct TestApp {
    pub router: Router,
    pub feed: Arc<StubFeed>,
    pub store: Arc<StubHolidayStore>,
    pub records: Arc<StubRecords>,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Router over stub collaborators; no database or network needed.
pub fn test_app() -> TestApp {
    let store = Arc::new(StubHolidayStore::default());
    let feed = Arc::new(StubFeed::new(store.clone()));
    let records = Arc::new(StubRecords::default());

    let calendar_config = CalendarConfig::default();
    let calendar = CalendarService::new(feed.clone(), &calendar_config);

    let state = AppState {
        records: records.clone(),
        holiday_store: store.clone(),
        calendar: Arc::new(calendar),
        calendar_config,
        cors_config: CorsConfig::from_list("*"),
        metrics: None,
    };

    TestApp {
        router: init_router(state),
        feed,
        store,
        records,
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
