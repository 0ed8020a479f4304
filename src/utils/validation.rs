//! Input validation utilities
//!
//! Forms carry their own derived rules; this module only maps the derive
//! machinery's failures into the application error taxonomy.

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run a form's derived checks, mapping failures into the application
/// taxonomy
pub fn validate_form<T: Validate>(form: &T) -> AppResult<()> {
    form.validate().map_err(AppError::from)
}
