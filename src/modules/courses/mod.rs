//! Courses module.
//!
//! Read access to courses and the term-picker options derived from their
//! year and semester structure.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
