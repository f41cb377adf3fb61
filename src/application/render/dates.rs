//! Date parsing and formatting for feed timestamps.
//!
//! Host records carry dates as strings. Naive values are taken as UTC.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::debug;

pub fn parse(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc2822) {
        return Some(value);
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }
    if let Ok(value) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(value.midnight().assume_utc());
    }

    debug!(
        target = "application::render::dates",
        value = raw,
        "Unrecognised date value; field omitted"
    );
    None
}

/// RSS date, e.g. `Mon, 01 Jan 2024 00:00:00 +0000`.
pub fn rfc822(value: OffsetDateTime) -> Option<String> {
    value.to_offset(UtcOffset::UTC).format(&Rfc2822).ok()
}

/// Atom date, e.g. `2024-01-01T00:00:00Z`.
pub fn rfc3339(value: OffsetDateTime) -> Option<String> {
    value.to_offset(UtcOffset::UTC).format(&Rfc3339).ok()
}
