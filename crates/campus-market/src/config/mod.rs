use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub catalog: CatalogConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let listings_csv = env::var("APP_LISTINGS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let report_hide_threshold = match env::var("APP_REPORT_HIDE_THRESHOLD") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|threshold| *threshold > 0)
                    .ok_or(ConfigError::InvalidReportThreshold)?,
            ),
            _ => None,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            catalog: CatalogConfig {
                listings_csv,
                report_hide_threshold,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Seeding and moderation controls for the in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Extra listings imported on top of the built-in fixtures.
    pub listings_csv: Option<PathBuf>,
    /// Records reported this many times drop out of browse results.
    pub report_hide_threshold: Option<u32>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidReportThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidReportThreshold => {
                write!(f, "APP_REPORT_HIDE_THRESHOLD must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
