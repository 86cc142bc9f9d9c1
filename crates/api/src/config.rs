use std::fmt::Display;
use std::str::FromStr;

use chrono::{FixedOffset, Utc};
use gymdesk_core::check_in::DuplicateCheckInPolicy;
use gymdesk_core::types::Date;

use crate::auth::jwt::JwtConfig;

/// A missing or unparsable environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Offset of the gym's local time from UTC. Decides which calendar
    /// day "today" is for check-ins and statistics.
    pub business_offset: FixedOffset,
    /// Whether a second same-day check-in is recorded or refused.
    pub duplicate_check_in_policy: DuplicateCheckInPolicy,
    pub log_format: LogFormat,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                       |
    /// | `UTC_OFFSET_MINUTES`        | `0`                        |
    /// | `DUPLICATE_CHECK_IN_POLICY` | `allow`                    |
    /// | `LOG_FORMAT`                | `pretty`                   |
    /// | `JWT_SECRET`                | -- (required)              |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30)?;

        let offset_minutes: i32 = env_or("UTC_OFFSET_MINUTES", 0)?;
        let business_offset = business_offset(offset_minutes)?;

        let duplicate_check_in_policy = env_or(
            "DUPLICATE_CHECK_IN_POLICY",
            DuplicateCheckInPolicy::default(),
        )?;
        let log_format = env_or("LOG_FORMAT", LogFormat::default())?;

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            business_offset,
            duplicate_check_in_policy,
            log_format,
            jwt,
        })
    }

    /// The current calendar date at the gym.
    pub fn today(&self) -> Date {
        Utc::now().with_timezone(&self.business_offset).date_naive()
    }

    /// The business offset in whole minutes, as the SQL layer takes it.
    pub fn utc_offset_minutes(&self) -> i32 {
        self.business_offset.local_minus_utc() / 60
    }
}

/// Build a UTC offset from minutes, rejecting anything a day or more away.
pub fn business_offset(minutes: i32) -> Result<FixedOffset, ConfigError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ConfigError::Invalid {
            var: "UTC_OFFSET_MINUTES",
            reason: format!("{minutes} is out of range (must be within +/-1439)"),
        })
}

/// Read and parse `var`, falling back to `default` when unset.
fn env_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_round_trips_minutes() {
        let offset = business_offset(9 * 60).unwrap();
        assert_eq!(offset.local_minus_utc(), 9 * 3600);
        assert!(business_offset(-330).is_ok());
    }

    #[test]
    fn offset_of_a_full_day_is_rejected() {
        assert!(business_offset(24 * 60).is_err());
        assert!(business_offset(i32::MAX).is_err());
    }

    #[test]
    fn log_format_parses() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
