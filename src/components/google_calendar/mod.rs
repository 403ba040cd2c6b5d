mod actor;
mod handle;
pub mod models;
pub mod payload;
pub mod token;

pub use handle::GoogleCalendarHandle;
pub use models::{CalendarEvent, EventDateTime, EventPayload, Reminders};
pub use payload::{build_event_payload, merge_event};

use crate::error::SyncResult;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

/// Calendar operations the reconciler needs
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Events overlapping `[start, end]`, recurring events expanded, ordered by
    /// start time
    async fn list_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> SyncResult<Vec<CalendarEvent>>;

    /// Insert a new event
    async fn create_event(&self, payload: &EventPayload) -> SyncResult<CalendarEvent>;

    /// Replace the event `event_id` with `body`
    async fn update_event(
        &self,
        event_id: &str,
        body: &Map<String, Value>,
    ) -> SyncResult<CalendarEvent>;
}
