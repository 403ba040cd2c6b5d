use super::models::{CalendarEvent, EventDateTime, EventPayload, Reminders};
use crate::components::match_source::Match;
use crate::error::{other_error, SyncResult};
use crate::utils::time::{format_import_time, match_end};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Build the event fields for `m`.
///
/// `site_url` is the league site used for the match link and `imported_at` the
/// time noted in the description.
pub fn build_event_payload(m: &Match, site_url: &str, imported_at: DateTime<Utc>) -> EventPayload {
    let mut description = String::new();
    if let Some(url) = m.url(site_url) {
        description.push_str(&format!("Match page: {}\n\n", url));
    }
    description.push_str(&format!(
        "Automatically imported on {} UTC.",
        format_import_time(imported_at)
    ));

    EventPayload {
        start: EventDateTime {
            date_time: m.date.to_rfc3339(),
        },
        end: EventDateTime {
            date_time: match_end(m.date).to_rfc3339(),
        },
        reminders: Reminders { use_default: true },
        summary: m.title.clone(),
        description,
        location: m.map.clone(),
    }
}

/// Overlay `payload` on an existing event.
///
/// Payload fields replace the event's; every other field, including `id`, is
/// kept.
pub fn merge_event(event: &CalendarEvent, payload: &EventPayload) -> SyncResult<Map<String, Value>> {
    let Value::Object(fields) = serde_json::to_value(payload)? else {
        return Err(other_error("Event payload did not serialize to an object"));
    };

    let mut merged = event.resource.clone();
    merged.extend(fields);
    Ok(merged)
}
