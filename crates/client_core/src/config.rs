use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::OptionsVariant;
use url::Url;

use crate::error::BackendError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api";
pub const DEFAULT_SETTINGS_FILE: &str = "portal.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub result_limit: Option<u32>,
    pub options_variant: OptionsVariant,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 15,
            result_limit: None,
            options_variant: OptionsVariant::Industries,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    result_limit: Option<u32>,
    options_variant: Option<OptionsVariant>,
}

/// Defaults, then the settings file (if present), then environment overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let mut settings = ClientSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file_settings(&mut settings, &raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_settings(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if file_cfg.result_limit.is_some() {
        settings.result_limit = file_cfg.result_limit;
    }
    if let Some(v) = file_cfg.options_variant {
        settings.options_variant = v;
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PORTAL_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__RESULT_LIMIT") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.result_limit = Some(parsed);
        }
    }

    if let Some(v) = lookup("APP__OPTIONS_VARIANT") {
        if let Ok(parsed) = v.parse::<OptionsVariant>() {
            settings.options_variant = parsed;
        }
    }
}

/// Canonical form of the API base URL: scheme present, no trailing slash.
pub fn normalize_api_base_url(raw: &str) -> Result<String, BackendError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let invalid = |reason: String| BackendError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(&candidate).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
