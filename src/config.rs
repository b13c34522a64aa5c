//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::time::Duration;

use crate::time_utils::MAX_HISTORY_DAYS;

/// Default trailing window for chart history queries, in days.
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Default buffer size of the change notification bus.
pub const DEFAULT_EVENT_BUFFER: usize = 16;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend project (e.g. `https://xyz.supabase.co`)
    pub supabase_url: String,
    /// Public anon key, sent as the `apikey` header
    pub supabase_anon_key: String,
    /// Signed-in user's access token (JWT), if a session exists
    pub access_token: Option<String>,
    /// Project JWT secret; when set, access tokens are signature-checked
    pub jwt_secret: Option<Vec<u8>>,
    /// Trailing window for history charts
    pub history_days: u32,
    /// Per-request timeout for row store calls
    pub request_timeout: Duration,
    /// Capacity of the change notification bus
    pub event_buffer: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            access_token: None,
            jwt_secret: None,
            history_days: DEFAULT_HISTORY_DAYS,
            request_timeout: Duration::from_secs(15),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            access_token: env::var("SUPABASE_ACCESS_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .ok()
                .map(|v| v.trim().as_bytes().to_vec())
                .filter(|v| !v.is_empty()),
            history_days: cap_history_days(parse_var("FITURE_HISTORY_DAYS", DEFAULT_HISTORY_DAYS)?)?,
            request_timeout: Duration::from_secs(parse_var("FITURE_REQUEST_TIMEOUT_SECS", 15)?),
            event_buffer: parse_var("FITURE_EVENT_BUFFER", DEFAULT_EVENT_BUFFER)?,
        })
    }
}

/// Read an optional numeric variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn cap_history_days(days: u32) -> Result<u32, ConfigError> {
    if days > MAX_HISTORY_DAYS {
        return Err(ConfigError::Invalid {
            name: "FITURE_HISTORY_DAYS",
            value: days.to_string(),
        });
    }
    Ok(days)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("SUPABASE_URL", "https://example.supabase.co/");
        env::set_var("SUPABASE_ANON_KEY", " anon ");
        env::set_var("FITURE_HISTORY_DAYS", "14");
        env::remove_var("FITURE_REQUEST_TIMEOUT_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.supabase_url, "https://example.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.history_days, 14);
        assert_eq!(config.request_timeout, Duration::from_secs(15));

        env::remove_var("FITURE_HISTORY_DAYS");
    }

    #[test]
    fn test_parse_var_rejects_non_numeric() {
        env::set_var("FITURE_TEST_BAD_NUMBER", "many");
        let result: Result<u32, _> = parse_var("FITURE_TEST_BAD_NUMBER", 3);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let fallback: u32 = parse_var("FITURE_TEST_UNSET_NUMBER", 3).unwrap();
        assert_eq!(fallback, 3);
    }

    #[test]
    fn test_history_days_is_capped() {
        assert_eq!(cap_history_days(MAX_HISTORY_DAYS).unwrap(), MAX_HISTORY_DAYS);
        assert!(matches!(
            cap_history_days(4_000_000_000),
            Err(ConfigError::Invalid { name: "FITURE_HISTORY_DAYS", ref value }) if value == "4000000000"
        ));
    }
}
