use crate::config::ConfigError;
use crate::marketplace::{
    EventError, ForumError, ListingError, ListingImportError, ModerationError, RepositoryError,
};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ListingImportError),
    Forum(ForumError),
    Events(EventError),
    Listings(ListingError),
    Moderation(ModerationError),
    Repository(RepositoryError),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Forum(err) => write!(f, "forum error: {}", err),
            AppError::Events(err) => write!(f, "events error: {}", err),
            AppError::Listings(err) => write!(f, "listings error: {}", err),
            AppError::Moderation(err) => write!(f, "moderation error: {}", err),
            AppError::Repository(err) => write!(f, "storage error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Forum(err) => Some(err),
            AppError::Events(err) => Some(err),
            AppError::Listings(err) => Some(err),
            AppError::Moderation(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ListingImportError> for AppError {
    fn from(value: ListingImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ForumError> for AppError {
    fn from(value: ForumError) -> Self {
        Self::Forum(value)
    }
}

impl From<EventError> for AppError {
    fn from(value: EventError) -> Self {
        Self::Events(value)
    }
}

impl From<ListingError> for AppError {
    fn from(value: ListingError) -> Self {
        Self::Listings(value)
    }
}

impl From<ModerationError> for AppError {
    fn from(value: ModerationError) -> Self {
        Self::Moderation(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
