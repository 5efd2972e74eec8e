use utoipa::OpenApi;

use crate::modules::academic_years::model::{AcademicYear, PersistedAcademicYear};
use crate::modules::calendar::model::{
    AttendanceStatus, CalendarCell, CalendarMonthData, CalendarMonthView,
    CreateInstituteHolidayDto, DayClassification, InstituteHoliday, MonthStateResponse,
    PublicHoliday,
};
use crate::modules::courses::model::{Course, YearSemesterConfig};
use crate::modules::terms::model::{CreateTermDto, Term, TermOptions, TermWithBatch};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::academic_years::controller::get_academic_years,
        crate::modules::academic_years::controller::get_academic_year_window,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::get_term_options,
        crate::modules::terms::controller::get_terms,
        crate::modules::terms::controller::create_term,
        crate::modules::calendar::controller::get_calendar_month,
        crate::modules::calendar::controller::get_month_state,
        crate::modules::calendar::controller::create_institute_holiday,
        crate::modules::calendar::controller::delete_institute_holiday,
    ),
    components(
        schemas(
            AcademicYear,
            PersistedAcademicYear,
            Course,
            YearSemesterConfig,
            Term,
            TermWithBatch,
            CreateTermDto,
            TermOptions,
            CalendarMonthView,
            CalendarMonthData,
            CalendarCell,
            DayClassification,
            AttendanceStatus,
            PublicHoliday,
            InstituteHoliday,
            CreateInstituteHolidayDto,
            MonthStateResponse,
        )
    ),
    tags(
        (name = "Academic Years", description = "Academic year records and the term-picker window"),
        (name = "Courses", description = "Courses and their term options"),
        (name = "Terms", description = "Term records with effective batch"),
        (name = "Calendar", description = "Holiday-aware month calendars and institute holidays")
    ),
    info(
        title = "Campusdesk API",
        version = "0.1.0",
        description = "Term resolution and holiday-aware calendars for an academic records portal.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
