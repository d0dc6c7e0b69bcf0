//! Customer contact normalization and checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ten digits, starting 6-9.
static MOBILE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MOBILE_DIGITS: usize = 10;

/// Keep digits only and cut to ten, the way the mobile inputs normalize
/// keystrokes (`"+91 98765-43210"` -> `"9198765432"`).
pub fn normalize_mobile(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit())
        .take(MOBILE_DIGITS)
        .collect()
}

pub fn is_valid_mobile(text: &str) -> bool {
    MOBILE_PATTERN.is_match(text)
}

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Trim, mapping blank strings to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
