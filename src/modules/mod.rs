pub mod academic_years;
pub mod calendar;
pub mod courses;
pub mod terms;

pub use self::calendar::service::CalendarService;
pub use self::terms::service::TermService;
