//! Customer customization submissions.
//!
//! Submissions arrive from the public tile customizer and are only read and
//! deleted by administrators.

use crate::error::CoreError;

/// Default page size for the submissions table.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page an admin client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Validate the quantity a customer asked for.
pub fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(CoreError::invalid(
            "tileQuantity",
            "Quantity must be a positive number",
        ))
    }
}

/// Validate that an image reference is an absolute http(s) URL.
pub fn validate_image_url(field: &'static str, url: &str) -> Result<(), CoreError> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::invalid(field, "Must be an absolute http(s) URL"))
    }
}
