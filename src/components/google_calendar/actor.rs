use super::models::{CalendarEvent, EventPayload};
use super::token::TokenManager;
use crate::config::Config;
use crate::error::{google_calendar_error, malformed_response_error, network_error, SyncResult};
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

/// The Google Calendar actor that processes messages
pub struct GoogleCalendarActor {
    config: Arc<Config>,
    token_manager: TokenManager,
    client: Client,
    command_rx: mpsc::Receiver<GoogleCalendarCommand>,
}

/// Commands that can be sent to the Google Calendar actor
pub enum GoogleCalendarCommand {
    ListEvents(
        DateTime<FixedOffset>,
        DateTime<FixedOffset>,
        mpsc::Sender<SyncResult<Vec<CalendarEvent>>>,
    ),
    CreateEvent(EventPayload, mpsc::Sender<SyncResult<CalendarEvent>>),
    UpdateEvent(
        String,
        Map<String, Value>,
        mpsc::Sender<SyncResult<CalendarEvent>>,
    ),
    Shutdown,
}

/// Handle for communicating with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarActorHandle {
    command_tx: mpsc::Sender<GoogleCalendarCommand>,
}

impl GoogleCalendarActorHandle {
    /// List events overlapping `[start, end]`
    pub async fn list_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> SyncResult<Vec<CalendarEvent>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::ListEvents(start, end, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Insert a new event
    pub async fn create_event(&self, payload: EventPayload) -> SyncResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::CreateEvent(payload, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Replace an existing event with `body`
    pub async fn update_event(
        &self,
        event_id: String,
        body: Map<String, Value>,
    ) -> SyncResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::UpdateEvent(event_id, body, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> SyncResult<()> {
        let _ = self.command_tx.send(GoogleCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<Config>) -> SyncResult<(Self, GoogleCalendarActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| network_error(&format!("Failed to build HTTP client: {}", e)))?;

        let actor = Self {
            config: Arc::clone(&config),
            token_manager: TokenManager::new(Arc::clone(&config), client.clone()),
            client,
            command_rx,
        };

        let handle = GoogleCalendarActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Google Calendar actor started");

        // Process commands one at a time
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoogleCalendarCommand::ListEvents(start, end, response_tx) => {
                    let result = self.list_events(start, end).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::CreateEvent(payload, response_tx) => {
                    let result = self.create_event(&payload).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::UpdateEvent(event_id, body, response_tx) => {
                    let result = self.update_event(&event_id, &body).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::Shutdown => {
                    info!("Google Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Google Calendar actor shut down");
    }

    /// `{api}/calendars/{calendar_id}/events[/{event_id}]` with every segment escaped
    fn events_url(&self, event_id: Option<&str>) -> SyncResult<Url> {
        let url_str = format!("{}/calendars", self.config.calendar_api_url);
        let mut url = Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| google_calendar_error("Calendar API URL cannot be a base"))?;
            segments.push(&self.config.calendar_id).push("events");
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }

        Ok(url)
    }

    /// Send an authorized request and decode the JSON response
    async fn send(&self, request: RequestBuilder, action: &str) -> SyncResult<Value> {
        let access_token = self.token_manager.get_token().await?;

        let response = request
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| network_error(&format!("Failed to {}: {}", action, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(network_error(&format!(
                "Failed to {}: HTTP {} - {}",
                action, status, error_body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(&format!("Failed to {}: {}", action, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| malformed_response_error(&format!("Failed to {}: {}", action, e)))
    }

    /// List events overlapping `[start, end]`, expanded and ordered by start time
    async fn list_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> SyncResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.events_url(None)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("timeMin", &start.to_rfc3339());
                query.append_pair("timeMax", &end.to_rfc3339());
                query.append_pair("singleEvents", "true");
                query.append_pair("orderBy", "startTime");
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response_data = self.send(self.client.get(url), "list events").await?;

            match response_data.get("items") {
                Some(Value::Array(items)) => {
                    for item in items {
                        events.push(CalendarEvent::from_resource(item.clone())?);
                    }
                }
                Some(_) => return Err(malformed_response_error("Event list items is not an array")),
                None => {}
            }

            page_token = response_data
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string());
            if page_token.is_none() {
                break;
            }
        }

        debug!("Listed {} events between {} and {}", events.len(), start, end);
        Ok(events)
    }

    /// Insert a new event
    async fn create_event(&self, payload: &EventPayload) -> SyncResult<CalendarEvent> {
        let url = self.events_url(None)?;
        let created = self
            .send(self.client.post(url).json(payload), "create event")
            .await?;
        CalendarEvent::from_resource(created)
    }

    /// Replace an existing event with `body`
    async fn update_event(
        &self,
        event_id: &str,
        body: &Map<String, Value>,
    ) -> SyncResult<CalendarEvent> {
        let url = self.events_url(Some(event_id))?;
        let updated = self
            .send(self.client.put(url).json(body), "update event")
            .await?;
        CalendarEvent::from_resource(updated)
    }
}
