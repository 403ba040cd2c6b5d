// Export components
pub mod google_calendar;
pub mod match_source;
pub mod reconciler;

// Re-export the pieces a sync run is assembled from
pub use google_calendar::{CalendarGateway, GoogleCalendarHandle};
pub use match_source::{LeagueApiClient, MatchService, MatchSource};
pub use reconciler::{sync_matches, ReconcileResult, Reconciler, SyncSummary};
