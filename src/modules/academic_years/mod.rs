//! Academic years module.
//!
//! Lists persisted academic years and the sliding prior/current/next window
//! offered by term pickers.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
