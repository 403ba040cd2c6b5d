#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use matchsync::components::google_calendar::{CalendarEvent, CalendarGateway, EventPayload};
use matchsync::components::match_source::{MatchSource, RawMatch, RawTeam};
use matchsync::error::{malformed_response_error, network_error, SyncResult};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the mock calendar has seen
#[derive(Debug, Default)]
pub struct MockCalendarState {
    pub events: Vec<CalendarEvent>,
    pub created: Vec<EventPayload>,
    pub updated: Vec<(String, Map<String, Value>)>,
    pub list_calls: usize,
    pub fail_create: bool,
    next_id: usize,
}

/// In-memory calendar used in place of Google Calendar
#[derive(Debug, Clone, Default)]
pub struct MockGoogleCalendar {
    state: Arc<Mutex<MockCalendarState>>,
}

impl MockGoogleCalendar {
    /// Create an empty mock calendar
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock calendar holding the given event resources
    pub fn with_events(resources: Vec<Value>) -> Self {
        let events = resources
            .into_iter()
            .map(|r| CalendarEvent::from_resource(r).unwrap())
            .collect();
        Self {
            state: Arc::new(Mutex::new(MockCalendarState {
                events,
                ..Default::default()
            })),
        }
    }

    /// Make every create call fail
    pub async fn fail_creates(&self) {
        self.state.lock().await.fail_create = true;
    }

    /// Lock the state for assertions
    pub async fn state(&self) -> tokio::sync::MutexGuard<'_, MockCalendarState> {
        self.state.lock().await
    }

    /// Events whose summary equals `title`
    pub async fn events_titled(&self, title: &str) -> Vec<CalendarEvent> {
        self.state
            .lock()
            .await
            .events
            .iter()
            .filter(|e| e.summary.as_deref() == Some(title))
            .cloned()
            .collect()
    }
}

fn bounds(event: &CalendarEvent) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let start = DateTime::parse_from_rfc3339(event.start_date_time.as_deref()?).ok()?;
    let end = DateTime::parse_from_rfc3339(event.end_date_time.as_deref()?).ok()?;
    Some((start, end))
}

#[async_trait]
impl CalendarGateway for MockGoogleCalendar {
    async fn list_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> SyncResult<Vec<CalendarEvent>> {
        let mut state = self.state.lock().await;
        state.list_calls += 1;

        // Same overlap rule as the real API: starts before timeMax, ends after timeMin
        let mut events: Vec<CalendarEvent> = state
            .events
            .iter()
            .filter(|e| matches!(bounds(e), Some((s, en)) if s < end && en > start))
            .cloned()
            .collect();
        events.sort_by_key(|e| bounds(e).map(|(s, _)| s));
        Ok(events)
    }

    async fn create_event(&self, payload: &EventPayload) -> SyncResult<CalendarEvent> {
        let mut state = self.state.lock().await;
        if state.fail_create {
            return Err(network_error("Failed to create event: HTTP 500"));
        }

        state.next_id += 1;
        let mut resource = serde_json::to_value(payload).unwrap();
        resource["id"] = json!(format!("event{}", state.next_id));

        let event = CalendarEvent::from_resource(resource)?;
        state.created.push(payload.clone());
        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        event_id: &str,
        body: &Map<String, Value>,
    ) -> SyncResult<CalendarEvent> {
        let mut state = self.state.lock().await;
        let updated = CalendarEvent::from_resource(Value::Object(body.clone()))?;
        if updated.id != event_id {
            return Err(malformed_response_error("Update body id does not match"));
        }

        let slot = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| network_error("Failed to update event: HTTP 404"))?;
        *slot = updated.clone();

        state.updated.push((event_id.to_string(), body.clone()));
        Ok(updated)
    }
}

/// Match source returning canned raw matches
#[derive(Debug, Clone, Default)]
pub struct MockMatchSource {
    matches: Vec<RawMatch>,
    fail: bool,
    requested: Arc<Mutex<Vec<i64>>>,
}

impl MockMatchSource {
    pub fn new(matches: Vec<RawMatch>) -> Self {
        Self {
            matches,
            ..Default::default()
        }
    }

    /// A source whose upstream is unreachable
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Team numbers requested so far
    pub async fn requested(&self) -> Vec<i64> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl MatchSource for MockMatchSource {
    async fn fetch(&self, team_number: i64) -> SyncResult<Vec<RawMatch>> {
        self.requested.lock().await.push(team_number);
        if self.fail {
            return Err(network_error("Failed to fetch matches: connection refused"));
        }
        Ok(self.matches.clone())
    }
}

/// Raw match between two teams
pub fn raw_match(id: i64, date: &str, home: Option<(i64, &str)>, away: Option<(i64, &str)>) -> RawMatch {
    let team = |(id, name): (i64, &str)| RawTeam {
        id,
        name: name.to_string(),
    };
    RawMatch {
        id: Some(id),
        date: date.to_string(),
        home: home.map(team),
        away: away.map(team),
        map: None,
    }
}

/// Event resource as Google would return it
pub fn event_resource(id: &str, summary: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "summary": summary,
        "start": {"dateTime": start},
        "end": {"dateTime": end},
    })
}
