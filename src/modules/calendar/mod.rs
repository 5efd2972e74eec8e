//! Calendar module.
//!
//! Serves holiday-aware month views: each month is composed from computed
//! Sundays, public holidays, institute holidays and attendance status, cached
//! in-process and rendered as a whole-week grid.

pub mod controller;
pub mod grid;
pub mod model;
pub mod router;
pub mod service;
