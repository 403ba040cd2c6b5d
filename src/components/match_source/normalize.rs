use super::censor::Censor;
use super::models::{match_title, Match, RawMatch, PENDING_MAP};
use crate::error::SyncResult;
use crate::utils::time::parse_match_date;
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;

/// Turns raw league API records into [`Match`] values for one team
#[derive(Clone)]
pub struct MatchNormalizer {
    team_number: i64,
    timezone: Tz,
    censor: Option<Arc<dyn Censor>>,
}

impl MatchNormalizer {
    pub fn new(team_number: i64) -> Self {
        Self {
            team_number,
            timezone: Tz::UTC,
            censor: None,
        }
    }

    /// Timezone used for dates that carry no offset
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Run opponent names through `censor`
    pub fn with_censor(mut self, censor: Arc<dyn Censor>) -> Self {
        self.censor = Some(censor);
        self
    }

    /// Normalize a single raw match
    pub fn normalize(&self, raw: &RawMatch) -> SyncResult<Match> {
        let date = parse_match_date(&raw.date, self.timezone)?;

        let enemy_team = self.enemy_team(raw).map(|name| match &self.censor {
            Some(censor) => censor.censor(&name),
            None => name,
        });

        Ok(Match {
            date,
            map: map_name(raw.map.as_ref()),
            title: match_title(enemy_team.as_deref()),
            enemy_team,
            id: raw.id,
        })
    }

    /// The side that is not us. Unknown until the home side is set.
    fn enemy_team(&self, raw: &RawMatch) -> Option<String> {
        let home = raw.home.as_ref()?;
        if home.id == self.team_number {
            raw.away.as_ref().map(|away| away.name.clone())
        } else {
            Some(home.name.clone())
        }
    }
}

/// Resolve the raw `map` field to a location string
fn map_name(map: Option<&Value>) -> String {
    let resolved = match map {
        Some(Value::Object(object)) => object.get("id").and_then(scalar_to_string),
        Some(other) => scalar_to_string(other),
        None => None,
    };

    resolved
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| PENDING_MAP.to_string())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::match_source::censor::WordListCensor;
    use crate::components::match_source::models::{RawTeam, UNASSIGNED_MATCH_TITLE};
    use serde_json::json;

    fn team(id: i64, name: &str) -> Option<RawTeam> {
        Some(RawTeam {
            id,
            name: name.to_string(),
        })
    }

    fn raw(home: Option<RawTeam>, away: Option<RawTeam>, map: Option<Value>) -> RawMatch {
        RawMatch {
            id: Some(42),
            date: "2024-01-05T18:00:00Z".to_string(),
            home,
            away,
            map,
        }
    }

    #[test]
    fn test_we_are_home() {
        let normalizer = MatchNormalizer::new(7);
        let m = normalizer
            .normalize(&raw(team(7, "Alpha"), team(9, "Beta"), None))
            .unwrap();
        assert_eq!(m.enemy_team.as_deref(), Some("Beta"));
        assert_eq!(m.title, "Match vs. Beta");
        assert_eq!(m.id, Some(42));
        assert_eq!(m.date.to_rfc3339(), "2024-01-05T18:00:00+00:00");
    }

    #[test]
    fn test_we_are_away() {
        let normalizer = MatchNormalizer::new(9);
        let m = normalizer
            .normalize(&raw(team(7, "Alpha"), team(9, "Beta"), None))
            .unwrap();
        assert_eq!(m.enemy_team.as_deref(), Some("Alpha"));
        assert_eq!(m.title, "Match vs. Alpha");
    }

    #[test]
    fn test_no_home_side_is_unassigned() {
        let normalizer = MatchNormalizer::new(7);
        let m = normalizer.normalize(&raw(None, team(9, "Beta"), None)).unwrap();
        assert_eq!(m.enemy_team, None);
        assert_eq!(m.title, UNASSIGNED_MATCH_TITLE);
        assert!(!m.is_confirmed());
    }

    #[test]
    fn test_home_is_us_without_away_side() {
        let normalizer = MatchNormalizer::new(7);
        let m = normalizer.normalize(&raw(team(7, "Alpha"), None, None)).unwrap();
        assert_eq!(m.enemy_team, None);
        assert_eq!(m.title, UNASSIGNED_MATCH_TITLE);
    }

    #[test]
    fn test_title_is_sentinel_iff_no_enemy() {
        let normalizer = MatchNormalizer::new(7);
        let cases = [
            raw(team(7, "Alpha"), team(9, "Beta"), None),
            raw(team(9, "Beta"), team(7, "Alpha"), None),
            raw(team(7, "Alpha"), None, None),
            raw(None, None, None),
            raw(None, team(7, "Alpha"), None),
        ];
        for case in cases {
            let m = normalizer.normalize(&case).unwrap();
            assert_eq!(m.title == UNASSIGNED_MATCH_TITLE, m.enemy_team.is_none());
        }
    }

    #[test]
    fn test_map_values() {
        assert_eq!(map_name(Some(&json!("de_dust2"))), "de_dust2");
        assert_eq!(map_name(Some(&json!({"id": null}))), PENDING_MAP);
        assert_eq!(map_name(Some(&json!({"id": "de_inferno"}))), "de_inferno");
        assert_eq!(map_name(Some(&json!({"id": 12}))), "12");
        assert_eq!(map_name(Some(&json!({}))), PENDING_MAP);
        assert_eq!(map_name(Some(&json!(null))), PENDING_MAP);
        assert_eq!(map_name(Some(&json!(""))), PENDING_MAP);
        assert_eq!(map_name(Some(&json!(["de_nuke"]))), PENDING_MAP);
        assert_eq!(map_name(None), PENDING_MAP);
    }

    #[test]
    fn test_censor_applies_to_enemy_team() {
        let normalizer = MatchNormalizer::new(7).with_censor(Arc::new(WordListCensor::default()));
        let m = normalizer
            .normalize(&raw(team(7, "Alpha"), team(9, "Shit Squad"), None))
            .unwrap();
        assert_eq!(m.enemy_team.as_deref(), Some("**** Squad"));
        assert_eq!(m.title, "Match vs. **** Squad");
    }

    #[test]
    fn test_without_censor_names_are_untouched() {
        let normalizer = MatchNormalizer::new(7);
        let m = normalizer
            .normalize(&raw(team(7, "Alpha"), team(9, "Shit Squad"), None))
            .unwrap();
        assert_eq!(m.enemy_team.as_deref(), Some("Shit Squad"));
    }

    #[test]
    fn test_bad_date_fails() {
        let normalizer = MatchNormalizer::new(7);
        let mut bad = raw(team(7, "Alpha"), team(9, "Beta"), None);
        bad.date = "soon".to_string();
        let err = normalizer.normalize(&bad).unwrap_err();
        assert!(matches!(err, crate::error::Error::DateParse(_)));
    }
}
