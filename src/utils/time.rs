use crate::error::{date_parse_error, SyncResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Offset-aware formats tried after RFC 3339 and RFC 2822
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Formats without an offset, read in the configured timezone
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Leniently parse a match date string into a timezone-aware timestamp.
///
/// Strings carrying an offset keep it. Strings without one are interpreted in
/// `timezone`.
pub fn parse_match_date(input: &str, timezone: Tz) -> SyncResult<DateTime<FixedOffset>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(date_parse_error("empty date string"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return match timezone.from_local_datetime(&naive) {
                chrono::LocalResult::Single(dt) => Ok(dt.fixed_offset()),
                // Prefer the earlier instant when clocks fall back
                chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
                chrono::LocalResult::None => Err(date_parse_error(&format!(
                    "{} does not exist in {}",
                    trimmed, timezone
                ))),
            };
        }
    }

    Err(date_parse_error(trimmed))
}

/// Time range searched for an existing event of a match starting at `date`.
///
/// The extra minute on both sides absorbs small skews between the source and
/// the stored event.
pub fn search_window(date: DateTime<FixedOffset>) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let start = date - Duration::minutes(1);
    let end = date + Duration::hours(1) + Duration::minutes(1);
    (start, end)
}

/// Matches are modelled as lasting exactly one hour
pub fn match_end(date: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    date + Duration::hours(1)
}

/// Format the import timestamp written into event descriptions
pub fn format_import_time(imported_at: DateTime<Utc>) -> String {
    imported_at.format("%c").to_string()
}
