//! Configuration management for Gate.
//!
//! This module handles loading and validating environment variables and application settings.

use crate::error::{GateError, Result};
use std::env;
use std::time::Duration;

/// Default Mazoku API base URL.
pub const DEFAULT_MAZOKU_API_URL: &str = "https://api.mazoku.cc";

/// Default per-user cooldown for stats commands, in seconds.
pub const DEFAULT_STATS_COOLDOWN_SECS: u64 = 10;

/// Default lifetime of cached card metadata, in hours.
pub const DEFAULT_CARD_CACHE_TTL_HOURS: u64 = 24;

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Path to SQLite database file holding claims
    pub db_path: String,
    /// Base URL of the Mazoku REST API
    pub mazoku_api_url: String,
    /// Per-user cooldown applied to stats commands
    pub stats_cooldown: Duration,
    /// How long fetched card metadata stays fresh
    pub card_cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read required environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gatebot::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("Mazoku API: {}", config.mazoku_api_url);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| GateError::Config(
                "Missing DISCORD_TOKEN environment variable. Set it in your environment or create a .env file (never commit this file).".to_string()
            ))?;

        let db_path = Self::get_db_path()?;

        let mazoku_api_url = env::var("MAZOKU_API_URL")
            .unwrap_or_else(|_| DEFAULT_MAZOKU_API_URL.to_string());
        Self::validate_api_url(&mazoku_api_url)?;

        let stats_cooldown = Duration::from_secs(
            Self::read_u64("STATS_COOLDOWN_SECS", DEFAULT_STATS_COOLDOWN_SECS)?,
        );

        let ttl_hours = Self::read_u64("CARD_CACHE_TTL_HOURS", DEFAULT_CARD_CACHE_TTL_HOURS)?;
        if ttl_hours == 0 {
            return Err(GateError::Config(
                "CARD_CACHE_TTL_HOURS must be at least 1".to_string()
            ));
        }
        let card_cache_ttl = Duration::from_secs(ttl_hours * 60 * 60);

        Ok(Self {
            discord_token,
            db_path,
            mazoku_api_url: mazoku_api_url.trim_end_matches('/').to_string(),
            stats_cooldown,
            card_cache_ttl,
        })
    }

    /// Get the database path from environment or use default.
    fn get_db_path() -> Result<String> {
        match env::var("DB_PATH") {
            Ok(path) => Ok(path),
            Err(_) => {
                let mut path = env::current_dir()
                    .map_err(|e| GateError::Config(
                        format!("Failed to determine current directory: {}", e)
                    ))?;

                path.push("data");
                path.push("gate.db");

                path.into_os_string()
                    .into_string()
                    .map_err(|os_str| GateError::Config(
                        format!("Database path contains invalid Unicode: {:?}", os_str)
                    ))
            }
        }
    }

    /// Read an optional non-negative integer variable, falling back to `default`.
    fn read_u64(name: &str, default: u64) -> Result<u64> {
        match env::var(name) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| GateError::Config(
                format!("{} must be a non-negative integer, got: '{}'", name, raw)
            )),
            Err(_) => Ok(default),
        }
    }

    /// Validate the API base URL format using proper URL parsing.
    fn validate_api_url(url_str: &str) -> Result<()> {
        use url::Url;

        let parsed_url = Url::parse(url_str)
            .map_err(|e| GateError::Config(
                format!("Invalid MAZOKU_API_URL '{}': {}", url_str, e)
            ))?;

        let scheme = parsed_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(GateError::Config(
                format!("MAZOKU_API_URL must use http:// or https:// scheme, got: '{}'", scheme)
            ));
        }

        if parsed_url.host_str().is_none() {
            return Err(GateError::Config(
                format!("MAZOKU_API_URL must contain a valid host: '{}'", url_str)
            ));
        }

        Ok(())
    }
}
