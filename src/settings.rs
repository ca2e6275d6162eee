use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Defaults for the connection flags, kept in the platform config dir so
/// operators don't have to repeat `--server`/`--database` on every run.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AdminSettings {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Connection parameters after applying precedence: CLI flag, then
/// environment, then settings file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub api_base: Option<String>,
    pub server: Option<String>,
    pub database: Option<String>,
}

impl AdminSettings {
    pub fn connection(
        &self,
        server: Option<String>,
        database: Option<String>,
        api_base: Option<String>,
    ) -> ConnectionConfig {
        ConnectionConfig {
            api_base: api_base
                .or_else(|| std::env::var("ANALYSIS_ADMIN_API_BASE").ok())
                .or_else(|| self.api_base.clone()),
            server: server
                .or_else(|| std::env::var("ANALYSIS_ADMIN_SERVER").ok())
                .or_else(|| self.server.clone()),
            database: database
                .or_else(|| std::env::var("ANALYSIS_ADMIN_DATABASE").ok())
                .or_else(|| self.database.clone()),
        }
    }
}

pub fn load_settings() -> anyhow::Result<AdminSettings> {
    load_settings_from(&settings_path()?)
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<AdminSettings> {
    if !path.exists() {
        return Ok(AdminSettings::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let settings: AdminSettings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(settings: &AdminSettings) -> anyhow::Result<()> {
    save_settings_to(settings, &settings_path()?)
}

pub fn save_settings_to(settings: &AdminSettings, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn settings_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("ANALYSIS_ADMIN_CONFIG_DIR") {
        return Ok(Path::new(&value).join("settings.json"));
    }
    let dirs = ProjectDirs::from("", "", "analysis-admin")
        .ok_or_else(|| anyhow::anyhow!("unable to determine config directory"))?;
    Ok(dirs.config_dir().join("settings.json"))
}
