use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Title given to matches that have no opponent yet
pub const UNASSIGNED_MATCH_TITLE: &str = "Default time for Match (unassigned)";
/// Location used while the map has not been picked
pub const PENDING_MAP: &str = "Pending map veto";

/// Body of `GET /api/teams/{team}/matches`
#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    pub data: Vec<RawMatch>,
}

/// One side of a match as returned by the league API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTeam {
    pub id: i64,
    pub name: String,
}

/// A match exactly as the league API returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub home: Option<RawTeam>,
    #[serde(default)]
    pub away: Option<RawTeam>,
    /// Either a plain map name or an object with an `id`
    #[serde(default)]
    pub map: Option<serde_json::Value>,
}

/// A normalized scheduled match
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub date: DateTime<FixedOffset>,
    pub map: String,
    pub title: String,
    pub enemy_team: Option<String>,
    pub id: Option<i64>,
}

impl Match {
    /// Whether an opponent has been assigned
    pub fn is_confirmed(&self) -> bool {
        self.title != UNASSIGNED_MATCH_TITLE
    }

    /// Link to the match page on the league site
    pub fn url(&self, site_url: &str) -> Option<String> {
        self.id.map(|id| format!("{}/match/{}", site_url, id))
    }
}

/// Title for a match against `enemy_team`, or the unassigned placeholder
pub fn match_title(enemy_team: Option<&str>) -> String {
    match enemy_team {
        Some(enemy) => format!("Match vs. {}", enemy),
        None => UNASSIGNED_MATCH_TITLE.to_string(),
    }
}
