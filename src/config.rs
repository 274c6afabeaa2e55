//! Report configuration from environment variables

use crate::error::ConfigError;
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INPUT_PATH: &str = "data/complaints.jsonl";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Configuration for report and export passes
///
/// Loaded from environment variables with defaults.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// JSONL file the record stream reads from
    pub input_path: PathBuf,

    /// Civil timezone for date/hour bucketing and export timestamps
    pub timezone: Tz,

    /// Deadline for aggregated reports
    pub report_timeout: Duration,

    /// Deadline for streamed CSV exports
    pub export_timeout: Duration,

    pub rust_log: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            timezone: DEFAULT_TIMEZONE,
            report_timeout: Duration::from_secs(60),
            export_timeout: Duration::from_secs(180),
            rust_log: None,
        }
    }
}

impl ReportConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `NOISEFLOW_INPUT_PATH` (default: data/complaints.jsonl)
    /// - `NOISEFLOW_TIMEZONE` (default: America/Los_Angeles)
    /// - `REPORT_TIMEOUT_SECS` (default: 60)
    /// - `EXPORT_TIMEOUT_SECS` (default: 180)
    /// - `RUST_LOG`
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timezone = match env::var("NOISEFLOW_TIMEZONE") {
            Ok(name) => parse_timezone(&name).unwrap_or_else(|e| {
                log::warn!("⚠️  {}, using {}", e, DEFAULT_TIMEZONE.name());
                DEFAULT_TIMEZONE
            }),
            Err(_) => DEFAULT_TIMEZONE,
        };

        Self {
            input_path: env::var("NOISEFLOW_INPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),

            timezone,

            report_timeout: env::var("REPORT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.report_timeout),

            export_timeout: env::var("EXPORT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.export_timeout),

            rust_log: env::var("RUST_LOG").ok(),
        }
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// A zero deadline would fail every pass before the first record
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("REPORT_TIMEOUT_SECS must be > 0".to_string()));
        }
        if self.export_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("EXPORT_TIMEOUT_SECS must be > 0".to_string()));
        }
        Ok(())
    }
}

/// IANA zone name, e.g. `America/Los_Angeles`
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidValue(format!("unknown timezone '{}'", name)))
}
