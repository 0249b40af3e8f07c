use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "ranked_dst.toml";
pub const PRODUCTION_SITE_URL: &str = "https://dontgetlosttogether.com";
pub const DEVELOPMENT_SITE_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub site_url: String,
    pub login_cooldown_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_url: PRODUCTION_SITE_URL.into(),
            login_cooldown_ms: 5_000,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn login_cooldown(&self) -> Duration {
        Duration::from_millis(self.login_cooldown_ms)
    }

    /// Url for a site path, without doubling the joining slash.
    pub fn site_page_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.site_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    site_url: Option<String>,
    login_cooldown_ms: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the config file (explicit path, or the per-user default if
/// it exists), then `APP__*` environment variables.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);
    if let Some(path) = path {
        match fs::read_to_string(&path) {
            Ok(raw) => {
                apply_file_overrides(&mut settings, &raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?;
            }
            Err(err) if explicit_path.is_some() => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
            Err(_) => tracing::debug!(path = %path.display(), "no config file; using defaults"),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ranked_dst").join(CONFIG_FILE_NAME))
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.site_url {
        settings.site_url = v;
    }
    if let Some(v) = file_cfg.login_cooldown_ms {
        settings.login_cooldown_ms = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__SITE_URL") {
        settings.site_url = v;
    }
    if let Some(v) = var("APP__LOGIN_COOLDOWN_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.login_cooldown_ms = parsed,
            Err(err) => tracing::warn!("ignoring APP__LOGIN_COOLDOWN_MS={v:?}: {err}"),
        }
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}
