use crate::error::{malformed_response_error, SyncResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A calendar event as stored by the calendar service.
///
/// The commonly used fields are lifted out; `resource` keeps the full record
/// so an update can send back fields this crate knows nothing about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub resource: Map<String, Value>,
}

impl CalendarEvent {
    /// Build an event from a resource returned by the calendar API
    pub fn from_resource(resource: Value) -> SyncResult<Self> {
        let Value::Object(resource) = resource else {
            return Err(malformed_response_error("Calendar event is not an object"));
        };

        let id = resource
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| malformed_response_error("Calendar event has no id"))?
            .to_string();
        let summary = resource
            .get("summary")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string());
        let start_date_time = date_time_of(&resource, "start");
        let end_date_time = date_time_of(&resource, "end");

        Ok(Self {
            id,
            summary,
            start_date_time,
            end_date_time,
            resource,
        })
    }
}

fn date_time_of(resource: &Map<String, Value>, key: &str) -> Option<String> {
    resource
        .get(key)
        .and_then(|v| v.as_object())
        .and_then(|v| v.get("dateTime"))
        .and_then(|dt| dt.as_str())
        .map(|s| s.to_string())
}

/// `start`/`end` of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
}

/// Reminder settings of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
}

/// Fields written for a match event on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
    pub summary: String,
    pub description: String,
    pub location: String,
}
