use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("config file is invalid:\n  {}", .0.join("\n  "))]
    #[diagnostic(
        code(matchsync::config_validation),
        help("fix every listed entry in the config file and run again")
    )]
    ConfigValidation(Vec<String>),

    #[error("Environment error: {0}")]
    #[diagnostic(code(matchsync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(matchsync::config))]
    Config(String),

    #[error("Network error: {0}")]
    #[diagnostic(code(matchsync::network))]
    Network(String),

    #[error("Malformed response: {0}")]
    #[diagnostic(code(matchsync::malformed_response))]
    MalformedResponse(String),

    #[error("Could not parse match date: {0}")]
    #[diagnostic(code(matchsync::date_parse))]
    DateParse(String),

    #[error("Google Calendar error: {0}")]
    #[diagnostic(code(matchsync::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(matchsync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(matchsync::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(matchsync::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create network errors
pub fn network_error(message: &str) -> Error {
    Error::Network(message.to_string())
}

/// Helper to create malformed response errors
pub fn malformed_response_error(message: &str) -> Error {
    Error::MalformedResponse(message.to_string())
}

/// Helper to create date parsing errors
pub fn date_parse_error(message: &str) -> Error {
    Error::DateParse(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
