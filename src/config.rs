use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
}

impl ApiSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                poll_interval_ms: 1000,
                max_poll_attempts: 900,
                request_timeout_secs: 30,
            },
        }
    }
}

/// Load settings from `config/minewatch.{toml,yaml,json}` (optional) and
/// `MINEWATCH__*` environment variables, on top of the built-in defaults.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from("config/minewatch")
}

pub fn load_settings_from(file_stem: &str) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let settings = ::config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .set_default("api.poll_interval_ms", defaults.api.poll_interval_ms as i64)?
        .set_default("api.max_poll_attempts", defaults.api.max_poll_attempts as i64)?
        .set_default("api.request_timeout_secs", defaults.api.request_timeout_secs as i64)?
        .add_source(::config::File::with_name(file_stem).required(false))
        .add_source(
            ::config::Environment::with_prefix("MINEWATCH")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
