use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use thiserror::Error;

use crate::interface_adapters::state::FormTimings;

// Runtime settings for the form server.

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    pub port: u16,
    pub submit_delay: Duration,
    pub redirect_delay: Duration,
    pub idle_ttl: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }
}

impl FormSettings {
    pub fn timings(&self) -> FormTimings {
        FormTimings {
            submit_delay: self.submit_delay,
            redirect_delay: self.redirect_delay,
            idle_ttl: self.idle_ttl,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// Optional values accepted in the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    port: Option<u16>,
    submit_delay_ms: Option<u64>,
    redirect_delay_ms: Option<u64>,
    idle_ttl_secs: Option<u64>,
}

/// Loads settings: defaults, then the `AUTH_FORM_CONFIG` file, then env vars.
pub fn load_settings() -> Result<FormSettings, ConfigError> {
    let mut settings = FormSettings::default();

    if let Ok(path) = env::var("AUTH_FORM_CONFIG") {
        let path = PathBuf::from(path);
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        settings =
            apply_file(settings, &raw).map_err(|source| ConfigError::Parse { path, source })?;
    }

    Ok(apply_env(settings, |key| env::var(key).ok()))
}

fn apply_file(mut settings: FormSettings, raw: &str) -> Result<FormSettings, toml::de::Error> {
    let file: FileSettings = toml::from_str(raw)?;

    if let Some(port) = file.port {
        settings.port = port;
    }
    if let Some(millis) = file.submit_delay_ms {
        settings.submit_delay = Duration::from_millis(millis);
    }
    if let Some(millis) = file.redirect_delay_ms {
        settings.redirect_delay = Duration::from_millis(millis);
    }
    if let Some(secs) = file.idle_ttl_secs {
        settings.idle_ttl = Duration::from_secs(secs);
    }
    Ok(settings)
}

// Unparseable values are ignored and the current value is kept.
fn apply_env(mut settings: FormSettings, lookup: impl Fn(&str) -> Option<String>) -> FormSettings {
    if let Some(port) = lookup("AUTH_FORM_PORT").and_then(|v| v.parse().ok()) {
        settings.port = port;
    }
    if let Some(millis) = lookup("AUTH_SUBMIT_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
        settings.submit_delay = Duration::from_millis(millis);
    }
    if let Some(millis) = lookup("AUTH_REDIRECT_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
        settings.redirect_delay = Duration::from_millis(millis);
    }
    if let Some(secs) = lookup("AUTH_FORM_IDLE_TTL_SECS").and_then(|v| v.parse::<u64>().ok()) {
        settings.idle_ttl = Duration::from_secs(secs);
    }
    settings
}
