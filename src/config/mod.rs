//! Application settings and configuration

use chrono::{FixedOffset, NaiveDate, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Ledger storage settings
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Scrape provider settings
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Webhook publisher settings
    #[serde(default)]
    pub publisher: PublisherSettings,
    /// Report formatting settings
    #[serde(default)]
    pub report: ReportSettings,
}

/// Ledger storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Path of the durable CSV table
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

fn default_ledger_path() -> String {
    "stats.csv".to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

/// Scrape provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Community page (member count)
    #[serde(default = "default_community_url")]
    pub community_url: String,
    /// Market page (token price and stock)
    #[serde(default = "default_market_url")]
    pub market_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_community_url() -> String {
    "https://financie.jp/communities/orochi_cnp/".to_string()
}

fn default_market_url() -> String {
    "https://financie.jp/communities/orochi_cnp/market".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            community_url: default_community_url(),
            market_url: default_market_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Webhook publisher settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherSettings {
    /// Webhook URL. Opaque secret: never logged or echoed in full.
    /// Usually supplied via `STATS_TRACKER__PUBLISHER__WEBHOOK_URL` or
    /// the legacy `DISCORD_WEBHOOK_URL` environment variable.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Report formatting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Title line of the posted message
    #[serde(default = "default_title")]
    pub title: String,
    /// Optional trailing tag line
    #[serde(default)]
    pub tag_line: Option<String>,
    /// Hour of day the report claims to be posted at (local time)
    #[serde(default = "default_post_hour")]
    pub post_hour: u32,
    /// Local timezone as a fixed UTC offset in hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_title() -> String {
    "Community token stats".to_string()
}

fn default_post_hour() -> u32 {
    6
}

fn default_utc_offset_hours() -> i32 {
    9
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            tag_line: None,
            post_hour: default_post_hour(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix("STATS_TRACKER")
    }

    /// Load settings with a custom environment variable prefix
    pub fn load_with_prefix(env_prefix: &str) -> Result<Self, ConfigError> {
        let config_dir = Self::config_dir();

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Add local overrides (not checked into git)
            .add_source(File::with_name(&format!("{}/local", config_dir)).required(false))
            // Add environment variables (e.g., STATS_TRACKER__LEDGER__PATH)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // Legacy alias kept for operators migrating from the old script.
        if settings.publisher.webhook_url.is_none() {
            settings.publisher.webhook_url = std::env::var("DISCORD_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty());
        }

        Ok(settings)
    }

    /// Get the configuration directory path
    fn config_dir() -> String {
        std::env::var("STATS_TRACKER_CONFIG_DIR").unwrap_or_else(|_| "config".into())
    }

    /// The run's "today" in the configured local timezone.
    pub fn today(&self) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.report.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        Utc::now().with_timezone(&offset).date_naive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger: LedgerSettings::default(),
            provider: ProviderSettings::default(),
            publisher: PublisherSettings::default(),
            report: ReportSettings::default(),
        }
    }
}
