use crate::error::{config_error, env_error, Error, SyncResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use toml::Value;

/// Default location of the config file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Default base URL of the match source
pub const DEFAULT_SOURCE_URL: &str = "https://play.esea.net";
/// Default base URL of the Google Calendar REST API
pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
/// Default location of the cached OAuth token
pub const DEFAULT_TOKEN_PATH: &str = ".cache/token.json";
/// Default total timeout for a single remote call
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// `[calendar]` section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSection {
    /// Google Calendar ID the matches are mirrored to
    pub id: String,
}

/// `[source]` section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSection {
    /// Team number on the league site
    pub team_number: i64,
    /// Whether opponent names are run through the profanity censor
    pub censor: bool,
}

/// The validated contents of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub calendar: CalendarSection,
    pub source: SourceSection,
}

/// Main configuration structure, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar ID to write events to
    pub calendar_id: String,
    /// Team number whose matches are mirrored
    pub team_number: i64,
    /// Censor opponent names
    pub censor: bool,
    /// Google OAuth client ID, used for token refresh
    pub google_client_id: String,
    /// Google OAuth client secret, used for token refresh
    pub google_client_secret: String,
    /// Base URL of the match source
    pub source_url: String,
    /// Base URL of the calendar API
    pub calendar_api_url: String,
    /// Cached OAuth token file
    pub token_path: PathBuf,
    /// Total timeout for each remote call, in seconds
    pub http_timeout_secs: u64,
    /// Timezone for match dates that carry no offset
    pub timezone: Tz,
}

impl ConfigFile {
    /// Parse and validate the config file contents.
    ///
    /// Every schema violation is collected before failing, so a broken file
    /// is reported in one go.
    pub fn parse(content: &str) -> SyncResult<Self> {
        let value: Value = toml::from_str(content)?;

        let violations = validate(&value);
        if !violations.is_empty() {
            return Err(Error::ConfigValidation(violations));
        }

        Ok(value.try_into()?)
    }
}

/// Expected type of a leaf value in the schema
#[derive(Clone, Copy)]
enum FieldType {
    String,
    Integer,
    Boolean,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::String, Value::String(_))
                | (FieldType::Integer, Value::Integer(_))
                | (FieldType::Boolean, Value::Boolean(_))
        )
    }
}

const SCHEMA: &[(&str, &[(&str, FieldType)])] = &[
    ("calendar", &[("id", FieldType::String)]),
    (
        "source",
        &[
            ("team_number", FieldType::Integer),
            ("censor", FieldType::Boolean),
        ],
    ),
];

/// Check a parsed config against the schema and return every violation
pub fn validate(value: &Value) -> Vec<String> {
    let mut violations = Vec::new();

    let Some(root) = value.as_table() else {
        violations.push("config must be a table".to_string());
        return violations;
    };

    for key in root.keys() {
        if !SCHEMA.iter().any(|(section, _)| *section == key.as_str()) {
            violations.push(format!("{}: unknown field", key));
        }
    }

    for (section, fields) in SCHEMA {
        let table = match root.get(*section) {
            None => {
                violations.push(format!("{}: required field", section));
                continue;
            }
            Some(Value::Table(table)) => table,
            Some(_) => {
                violations.push(format!("{}: must be of table type", section));
                continue;
            }
        };

        for key in table.keys() {
            if !fields.iter().any(|(field, _)| *field == key.as_str()) {
                violations.push(format!("{}.{}: unknown field", section, key));
            }
        }

        for (field, field_type) in fields.iter() {
            match table.get(*field) {
                None => violations.push(format!("{}.{}: required field", section, field)),
                Some(v) if !field_type.matches(v) => violations.push(format!(
                    "{}.{}: must be of {} type",
                    section,
                    field,
                    field_type.name()
                )),
                Some(_) => {}
            }
        }
    }

    violations
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let config_path =
            env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let content = fs::read_to_string(&config_path)
            .map_err(|e| config_error(&format!("Failed to read {}: {}", config_path, e)))?;
        let file = ConfigFile::parse(&content)?;

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        let source_url =
            env::var("MATCH_SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
        let calendar_api_url = env::var("GOOGLE_CALENDAR_API_URL")
            .unwrap_or_else(|_| DEFAULT_CALENDAR_API_URL.to_string());
        let token_path = env::var("TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_PATH));

        let http_timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid HTTP_TIMEOUT_SECS format"))?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        // Default timezone
        let timezone_str = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));
        let timezone: Tz = timezone_str
            .parse()
            .map_err(|_| config_error(&format!("Invalid TIMEZONE: {}", timezone_str)))?;

        Ok(Config::from_parts(
            file,
            google_client_id,
            google_client_secret,
        )
        .with_source_url(source_url)
        .with_calendar_api_url(calendar_api_url)
        .with_token_path(token_path)
        .with_http_timeout_secs(http_timeout_secs)
        .with_timezone(timezone))
    }

    /// Build a config from a validated file and OAuth client credentials,
    /// using defaults for everything else
    pub fn from_parts(file: ConfigFile, google_client_id: String, google_client_secret: String) -> Self {
        Self {
            calendar_id: file.calendar.id,
            team_number: file.source.team_number,
            censor: file.source.censor,
            google_client_id,
            google_client_secret,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            calendar_api_url: DEFAULT_CALENDAR_API_URL.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            timezone: Tz::UTC,
        }
    }

    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = source_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_calendar_api_url(mut self, calendar_api_url: impl Into<String>) -> Self {
        self.calendar_api_url = calendar_api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_path(mut self, token_path: impl Into<PathBuf>) -> Self {
        self.token_path = token_path.into();
        self
    }

    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Per-call timeout for the HTTP clients
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        [calendar]
        id = "team@group.calendar.google.com"

        [source]
        team_number = 7
        censor = true
    "#;

    #[test]
    fn test_parse_valid_config() {
        let file = ConfigFile::parse(VALID).unwrap();
        assert_eq!(file.calendar.id, "team@group.calendar.google.com");
        assert_eq!(file.source.team_number, 7);
        assert!(file.source.censor);
    }

    #[test]
    fn test_reports_all_violations() {
        let content = r#"
            extra = 1

            [calendar]

            [source]
            team_number = "seven"
            censor = "yes"
            colour = "red"
        "#;

        let err = ConfigFile::parse(content).unwrap_err();
        let Error::ConfigValidation(violations) = err else {
            panic!("expected a validation error, got {:?}", err);
        };

        assert_eq!(violations.len(), 5);
        assert!(violations.contains(&"extra: unknown field".to_string()));
        assert!(violations.contains(&"calendar.id: required field".to_string()));
        assert!(violations.contains(&"source.colour: unknown field".to_string()));
        assert!(violations.contains(&"source.team_number: must be of integer type".to_string()));
        assert!(violations.contains(&"source.censor: must be of boolean type".to_string()));
    }

    #[test]
    fn test_missing_sections() {
        let err = ConfigFile::parse("").unwrap_err();
        let Error::ConfigValidation(violations) = err else {
            panic!("expected a validation error, got {:?}", err);
        };
        assert_eq!(
            violations,
            vec![
                "calendar: required field".to_string(),
                "source: required field".to_string()
            ]
        );
    }

    #[test]
    fn test_section_with_wrong_type() {
        let err = ConfigFile::parse("calendar = 3\n[source]\nteam_number = 1\ncensor = false\n")
            .unwrap_err();
        let Error::ConfigValidation(violations) = err else {
            panic!("expected a validation error, got {:?}", err);
        };
        assert_eq!(violations, vec!["calendar: must be of table type".to_string()]);
    }

    #[test]
    fn test_invalid_toml_is_a_serialization_error() {
        let err = ConfigFile::parse("[calendar").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_builders_trim_trailing_slash() {
        let file = ConfigFile::parse(VALID).unwrap();
        let config = Config::from_parts(file, "id".to_string(), "secret".to_string())
            .with_source_url("http://localhost:1234/")
            .with_calendar_api_url("http://localhost:5678/calendar/v3/");
        assert_eq!(config.source_url, "http://localhost:1234");
        assert_eq!(config.calendar_api_url, "http://localhost:5678/calendar/v3");
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }
}
