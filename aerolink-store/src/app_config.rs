use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub disruption: DisruptionConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Path of the persisted session entry (the localStorage analogue).
    pub storage_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Debounce applied after a successful rebooking before dependent views
    /// refetch; the backend's state update is assumed not to be immediately
    /// consistent with a subsequent GET.
    #[serde(default = "default_rebook_refresh_delay_ms")]
    pub rebook_refresh_delay_ms: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_poll_interval_ms() -> u64 { 30_000 }
fn default_rebook_refresh_delay_ms() -> u64 { 1_000 }
fn default_search_debounce_ms() -> u64 { 300 }

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            rebook_refresh_delay_ms: default_rebook_refresh_delay_ms(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisruptionConfig {
    #[serde(default = "default_delay_reason")]
    pub delay_reason: String,
    /// Synthetic delay applied by the simulate-delay action.
    #[serde(default = "default_delay_offset_minutes")]
    pub delay_offset_minutes: i64,
}

fn default_delay_reason() -> String { "Technical issues with aircraft".to_string() }
fn default_delay_offset_minutes() -> i64 { 120 }

impl Default for DisruptionConfig {
    fn default() -> Self {
        Self {
            delay_reason: default_delay_reason(),
            delay_offset_minutes: default_delay_offset_minutes(),
        }
    }
}

/// Optional credentials for the demo driver; absent in normal use.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DemoConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of AEROLINK)
            // Eg. `AEROLINK_API__BASE_URL=...` would set `api.base_url`
            .add_source(config::Environment::with_prefix("AEROLINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
