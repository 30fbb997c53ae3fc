use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::controller::form::NumericInputPolicy;

const LOCAL_SETTINGS_FILE: &str = "yield_predictor.toml";

#[derive(Parser, Debug, Default)]
#[command(name = "yield-predictor", about = "Maize yield prediction desktop client")]
pub struct Args {
    /// Settings file to read instead of the default locations.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Base URL of the prediction server; `/predict` is appended.
    #[arg(long)]
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout: Option<Duration>,
    pub numeric_input: NumericInputPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            request_timeout: None,
            numeric_input: NumericInputPolicy::CoerceToZero,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    numeric_input: Option<NumericInputPolicy>,
}

/// Defaults, then the settings file, then environment, then flags.
pub fn load_settings(args: &Args) -> Settings {
    load_settings_with_env(args, |name| std::env::var(name).ok())
}

fn load_settings_with_env(args: &Args, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match locate_settings_file(args) {
        Some((path, file_cfg)) => {
            tracing::info!(path = %path.display(), "loaded settings file");
            apply_file_settings(&mut settings, file_cfg);
        }
        None => tracing::debug!("no settings file found; using defaults"),
    }

    apply_env_overrides(&mut settings, lookup);

    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    settings.server_url = normalize_server_url(&settings.server_url);

    settings
}

/// First readable candidate. Unreadable or malformed files are logged and skipped.
fn locate_settings_file(args: &Args) -> Option<(PathBuf, FileSettings)> {
    for path in settings_file_candidates(args) {
        match read_settings_file(&path) {
            Ok(Some(file_cfg)) => return Some((path, file_cfg)),
            Ok(None) if args.config.is_some() => {
                tracing::warn!(path = %path.display(), "settings file not found");
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring settings file: {err:#}");
            }
        }
    }
    None
}

fn settings_file_candidates(args: &Args) -> Vec<PathBuf> {
    if let Some(path) = &args.config {
        return vec![path.clone()];
    }

    let mut candidates = vec![PathBuf::from(LOCAL_SETTINGS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("yield_predictor").join("settings.toml"));
    }
    candidates
}

/// `Ok(None)` when the file does not exist.
fn read_settings_file(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        other => other.with_context(|| format!("failed to read '{}'", path.display()))?,
    };

    let file_cfg = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(file_cfg))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(secs) = file_cfg.request_timeout_secs {
        settings.request_timeout = timeout_from_secs(secs);
    }
    if let Some(policy) = file_cfg.numeric_input {
        settings.numeric_input = policy;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PREDICT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(secs) => settings.request_timeout = timeout_from_secs(secs),
            Err(err) => tracing::warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS: {err}"),
        }
    }

    if let Some(v) = lookup("APP__NUMERIC_INPUT") {
        match v.parse::<NumericInputPolicy>() {
            Ok(policy) => settings.numeric_input = policy,
            Err(err) => tracing::warn!("ignoring APP__NUMERIC_INPUT: {err}"),
        }
    }
}

/// Zero means no timeout.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn normalize_server_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
