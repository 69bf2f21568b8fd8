//! Field validation helpers used by entity drafts and patches.

use crate::{error::Result, Error};

/// A required text field: must be non-empty after trimming.
///
/// Returns the trimmed value.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// An optional replacement for a required text field.
pub fn patched_text(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) => required_text(field, v).map(|_| ()),
        None => Ok(()),
    }
}

/// A monetary amount: finite and not negative.
pub fn amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(Error::validation(field, "must not be negative"));
    }
    Ok(())
}

/// A count that must be at least one.
pub fn positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::validation(field, "must be at least 1"));
    }
    Ok(())
}
