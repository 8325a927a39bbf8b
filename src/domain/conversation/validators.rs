//! Input validators for request intake.
//!
//! All validators are pure and total: malformed input is reported through the
//! return value, never by panicking.

use crate::domain::foundation::ValidationError;

/// Minimum length, in characters, of free-text address and message fields.
pub const MIN_FREE_TEXT_LEN: usize = 5;

/// Maximum number of guests in one transfer.
pub const MAX_GUESTS: u8 = 10;

const DATE_KEYWORDS: [&str; 4] = ["today", "tomorrow", "сегодня", "завтра"];

/// Accepts "today"/"tomorrow" (also in Russian) or `DD.MM`.
///
/// Day and month are range-checked independently; there is no
/// days-in-month check, so `31.02` is accepted.
pub fn validate_date(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if DATE_KEYWORDS.contains(&text.as_str()) {
        return true;
    }
    match split_pair(&text, '.') {
        Some((day, month)) => (1..=31).contains(&day) && (1..=12).contains(&month),
        None => false,
    }
}

/// Accepts `HH:MM` with hour 0..=23 and minute 0..=59.
pub fn validate_time(text: &str) -> bool {
    match split_pair(text.trim(), ':') {
        Some((hour, minute)) => hour <= 23 && minute <= 59,
        None => false,
    }
}

/// Parses a guest count in `1..=10`.
pub fn validate_guest_count(text: &str) -> Result<u8, ValidationError> {
    let text = text.trim();
    let value: i64 = text
        .parse()
        .map_err(|_| ValidationError::invalid_format("guests", "expected a whole number"))?;
    if !(1..=i64::from(MAX_GUESTS)).contains(&value) {
        return Err(ValidationError::out_of_range(
            "guests",
            1,
            i64::from(MAX_GUESTS),
            value,
        ));
    }
    Ok(value as u8)
}

/// Trims `text` and checks it has at least `min` characters.
pub fn validate_min_length(field: &str, text: &str, min: usize) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ValidationError::empty_field(field));
    }
    if len < min {
        return Err(ValidationError::too_short(field, min, len));
    }
    Ok(trimmed.to_string())
}

/// Splits `a<sep>b` where both parts are 1-2 ASCII digits.
fn split_pair(text: &str, sep: char) -> Option<(u32, u32)> {
    let (left, right) = text.split_once(sep)?;
    Some((small_number(left)?, small_number(right)?))
}

fn small_number(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
