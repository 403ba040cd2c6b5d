pub mod censor;
mod client;
pub mod models;
mod normalize;

pub use censor::{Censor, WordListCensor};
pub use client::LeagueApiClient;
pub use models::{Match, RawMatch, RawTeam, PENDING_MAP, UNASSIGNED_MATCH_TITLE};
pub use normalize::MatchNormalizer;

use crate::config::Config;
use crate::error::SyncResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Transport that returns a team's raw matches from the league API
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Fetch every raw match of `team_number`
    async fn fetch(&self, team_number: i64) -> SyncResult<Vec<RawMatch>>;
}

/// Fetches and normalizes the configured team's matches
pub struct MatchService<S> {
    source: S,
    team_number: i64,
    normalizer: MatchNormalizer,
}

impl<S: MatchSource> MatchService<S> {
    /// Create a service for one team with no censoring
    pub fn new(source: S, team_number: i64) -> Self {
        Self {
            source,
            team_number,
            normalizer: MatchNormalizer::new(team_number),
        }
    }

    /// Create a service following the application config
    pub fn from_config(source: S, config: &Config) -> Self {
        let mut normalizer = MatchNormalizer::new(config.team_number).with_timezone(config.timezone);
        if config.censor {
            normalizer = normalizer.with_censor(Arc::new(WordListCensor::default()));
        }

        Self {
            source,
            team_number: config.team_number,
            normalizer,
        }
    }

    /// Replace the normalizer, e.g. to plug in another censor
    pub fn with_normalizer(mut self, normalizer: MatchNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// All matches of the team, in the order the source returned them
    pub async fn fetch_matches(&self) -> SyncResult<Vec<Match>> {
        let raw_matches = self.source.fetch(self.team_number).await?;
        info!(
            "Fetched {} matches for team {}",
            raw_matches.len(),
            self.team_number
        );

        raw_matches
            .iter()
            .map(|raw| self.normalizer.normalize(raw))
            .collect()
    }

    /// Only the matches with an assigned opponent
    pub async fn fetch_confirmed_matches(&self) -> SyncResult<Vec<Match>> {
        let confirmed: Vec<Match> = self
            .fetch_matches()
            .await?
            .into_iter()
            .filter(Match::is_confirmed)
            .collect();

        info!("{} confirmed matches", confirmed.len());
        Ok(confirmed)
    }
}
