//! Canonical spreadsheet-serial conversion and pinned-format text parsing.
//!
//! Spreadsheet exports encode timestamps as a floating-point day count
//! anchored at 1899-12-30 (serial 25569 == 1970-01-01); the fractional part
//! encodes the time of day. Two historical implementations of this conversion
//! disagreed on rounding, so this module is the single rule: truncate to whole
//! seconds after adding a small epsilon to the fractional day. The epsilon
//! counters float artifacts that would otherwise round a whole second down
//! (e.g. `0.5` stored as `0.4999999...` decoding to 11:59:59).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Serial day number of the Unix epoch (1970-01-01).
pub const UNIX_EPOCH_SERIAL_DAYS: i64 = 25_569;

/// Epsilon added to the fractional day before decomposing into h/m/s.
const FRACTION_EPSILON: f64 = 1e-7;

const SECONDS_PER_DAY: i64 = 86_400;

/// Output date format, `dd/mm/yyyy`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Output time format, 24-hour.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Pinned formats for free-text timestamps. RFC 3339 is tried first,
/// separately. Ambient locale parsing is never used.
const TEXT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Pinned formats for free-text dates without a time component.
const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Convert a spreadsheet serial value to a calendar timestamp.
///
/// Whole days are `floor(serial) - 25569` relative to the Unix epoch; the
/// fractional day becomes seconds-of-day by truncation after the epsilon.
/// Returns `None` for non-finite serials or values outside the chrono range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }

    let mut days = serial.floor() as i64 - UNIX_EPOCH_SERIAL_DAYS;
    let fraction = serial - serial.floor();

    #[allow(clippy::cast_possible_truncation)]
    let mut seconds = ((fraction + FRACTION_EPSILON) * SECONDS_PER_DAY as f64) as i64;

    // The epsilon can push a value sitting exactly on midnight past the
    // end of its day.
    if seconds >= SECONDS_PER_DAY {
        days += 1;
        seconds -= SECONDS_PER_DAY;
    }

    let timestamp = days.checked_mul(SECONDS_PER_DAY)?.checked_add(seconds)?;
    Some(DateTime::from_timestamp(timestamp, 0)?.naive_utc())
}

/// Format as `"dd/mm/yyyy"`.
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Format as `"dd/mm/yyyy, HH:MM:SS"`. The comma separator is what the
/// dashboard splits on to stack date and time in a cell.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    format!("{}, {}", dt.format(DATE_FORMAT), dt.format(TIME_FORMAT))
}

/// Parse free text against the pinned format list.
pub fn parse_text_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for fmt in TEXT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in TEXT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse free text to a calendar day against the pinned format list.
pub fn parse_text_date(text: &str) -> Option<NaiveDate> {
    parse_text_datetime(text).map(|dt| dt.date())
}
