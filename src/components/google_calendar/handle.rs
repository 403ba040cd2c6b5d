use super::actor::GoogleCalendarActorHandle;
use super::models::{CalendarEvent, EventPayload};
use super::CalendarGateway;
use crate::config::Config;
use crate::error::SyncResult;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(config: Arc<Config>) -> SyncResult<Self> {
        use super::actor::GoogleCalendarActor;

        // Create the actor and get its handle
        let (mut actor, handle) = GoogleCalendarActor::new(config)?;

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        })
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarHandle {
    async fn list_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> SyncResult<Vec<CalendarEvent>> {
        self.actor_handle.list_events(start, end).await
    }

    async fn create_event(&self, payload: &EventPayload) -> SyncResult<CalendarEvent> {
        self.actor_handle.create_event(payload.clone()).await
    }

    async fn update_event(
        &self,
        event_id: &str,
        body: &Map<String, Value>,
    ) -> SyncResult<CalendarEvent> {
        self.actor_handle
            .update_event(event_id.to_string(), body.clone())
            .await
    }
}
