//! Term data models and DTOs.
//!
//! Re-exports the term models from the `campusdesk-models` crate.

pub use campusdesk_models::terms::*;
