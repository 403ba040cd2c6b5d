use crate::components::google_calendar::{
    build_event_payload, merge_event, CalendarEvent, CalendarGateway,
};
use crate::components::match_source::{Match, MatchService, MatchSource};
use crate::error::SyncResult;
use crate::utils::time::search_window;
use chrono::Utc;
use std::fmt;
use tracing::info;

/// What reconciling a match did to the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileResult {
    Created,
    Updated,
}

impl fmt::Display for ReconcileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileResult::Created => write!(f, "created"),
            ReconcileResult::Updated => write!(f, "updated"),
        }
    }
}

/// Counts for one sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
}

impl SyncSummary {
    fn record(&mut self, result: ReconcileResult) {
        match result {
            ReconcileResult::Created => self.created += 1,
            ReconcileResult::Updated => self.updated += 1,
        }
    }
}

/// The event already representing a match: the first one whose summary equals
/// the title exactly.
///
/// When several events share the title, the earliest listed one is always
/// picked, so a duplicate title updates the same event instead of creating
/// another.
pub fn find_existing_event<'a>(events: &'a [CalendarEvent], title: &str) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .find(|event| event.summary.as_deref() == Some(title))
}

/// Creates or updates the calendar event of each match
pub struct Reconciler<G> {
    gateway: G,
    site_url: String,
}

impl<G: CalendarGateway> Reconciler<G> {
    /// `site_url` is the league site the match links point to
    pub fn new(gateway: G, site_url: impl Into<String>) -> Self {
        Self {
            gateway,
            site_url: site_url.into(),
        }
    }

    /// The gateway this reconciler writes through
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Idempotently create or update the event of `m`
    pub async fn reconcile(&self, m: &Match) -> SyncResult<ReconcileResult> {
        let (start, end) = search_window(m.date);
        let events = self.gateway.list_events(start, end).await?;
        let payload = build_event_payload(m, &self.site_url, Utc::now());

        match find_existing_event(&events, &m.title) {
            Some(existing) => {
                info!("Updating existing event {} for {}", existing.id, m.title);
                let body = merge_event(existing, &payload)?;
                self.gateway.update_event(&existing.id, &body).await?;
                Ok(ReconcileResult::Updated)
            }
            None => {
                info!("Creating new event for {} at {}", m.title, m.date);
                self.gateway.create_event(&payload).await?;
                Ok(ReconcileResult::Created)
            }
        }
    }

    /// Reconcile every match in order, stopping at the first error
    pub async fn reconcile_all(&self, matches: &[Match]) -> SyncResult<SyncSummary> {
        let mut summary = SyncSummary::default();
        for m in matches {
            let result = self.reconcile(m).await?;
            summary.record(result);
        }
        Ok(summary)
    }
}

/// Mirror every confirmed match of the source onto the calendar
pub async fn sync_matches<S, G>(
    matches: &MatchService<S>,
    reconciler: &Reconciler<G>,
) -> SyncResult<SyncSummary>
where
    S: MatchSource,
    G: CalendarGateway,
{
    let confirmed = matches.fetch_confirmed_matches().await?;
    let summary = reconciler.reconcile_all(&confirmed).await?;

    info!(
        "Sync finished: {} created, {} updated",
        summary.created, summary.updated
    );
    Ok(summary)
}
