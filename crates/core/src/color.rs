//! Palette color rules.
//!
//! Hex codes are the identity of a color for presentation purposes (two
//! color rows with the same hex collapse to one entry in `colorsUsed`), so
//! every hex code is normalized to lowercase `#rrggbb` before it is stored
//! or compared.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

/// Normalize a user-supplied hex code to lowercase `#rrggbb`.
///
/// Accepts an optional leading `#` and the 3-digit shorthand.
///
/// ```
/// use tiledash_core::color::normalize_hex;
///
/// assert_eq!(normalize_hex("#FFAA00").unwrap(), "#ffaa00");
/// assert_eq!(normalize_hex("fa0").unwrap(), "#ffaa00");
/// assert!(normalize_hex("#12345").is_err());
/// ```
pub fn normalize_hex(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let caps = HEX_RE.captures(trimmed).ok_or_else(|| {
        CoreError::invalid(
            "hexCode",
            format!("'{trimmed}' is not a valid hex color (expected #rgb or #rrggbb)"),
        )
    })?;

    let digits = caps[1].to_ascii_lowercase();
    let expanded = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        digits
    };

    Ok(format!("#{expanded}"))
}
