//! Terms module.
//!
//! Resolves which (year of study, semester) pairs are valid for a course,
//! builds the academic-year window offered by term pickers and manages term
//! records with their effective batch.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
