use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use git2::Config as GitConfig;
use log::debug;

pub const CONFIG_ENV: &str = "HOOKWIRE_CONFIG";
pub const FORMAT_ENV: &str = "HOOKWIRE_FORMAT";

/// Get a configuration value with layered priority: env var > local git config > global git config
fn get_layered_value(
    key: &str,
    env_var: Option<&str>,
    local_config: Option<&GitConfig>,
    global_config: Option<&GitConfig>,
) -> Option<String> {
    if let Some(env) = env_var
        && let Ok(val) = std::env::var(env)
        && !val.is_empty()
    {
        return Some(val);
    }

    if let Some(local) = local_config
        && let Ok(val) = local.get_string(key)
    {
        return Some(val);
    }

    if let Some(global) = global_config
        && let Ok(val) = global.get_string(key)
    {
        return Some(val);
    }

    None
}

/// How the CLI prints plans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

/// Settings for locating and presenting the hook configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Explicit document path; discovered from the working tree when unset
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Settings {
    /// Load the settings with layered priority: env > local git > global git
    pub fn load() -> Result<Self> {
        // String lookups are only allowed on snapshots.
        let global_config = GitConfig::open_default()
            .and_then(|mut c| c.snapshot())
            .ok();
        let local_config = git2::Repository::discover(".")
            .ok()
            .and_then(|repo| repo.config().and_then(|mut c| c.snapshot()).ok());

        Self::from_layers(local_config.as_ref(), global_config.as_ref())
    }

    fn from_layers(local: Option<&GitConfig>, global: Option<&GitConfig>) -> Result<Self> {
        let config_path =
            get_layered_value("hookwire.config", Some(CONFIG_ENV), local, global).map(PathBuf::from);

        let format = get_layered_value("hookwire.format", Some(FORMAT_ENV), local, global)
            .map(|v| v.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default();

        let settings = Self {
            config_path,
            format,
        };
        debug!("Settings loaded: {settings:?}");
        Ok(settings)
    }
}
