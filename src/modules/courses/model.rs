//! Course data models.
//!
//! Re-exports course models from the `campusdesk-models` crate.

pub use campusdesk_models::courses::*;
