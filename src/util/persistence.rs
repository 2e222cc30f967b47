use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::util::config::AppConfig;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "FleetWatch";
const APP_NAME: &str = "FleetWatch";

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

pub fn load_settings() -> Option<AppConfig> {
    read_settings(&settings_file()?)
}

pub fn save_settings(config: &AppConfig) -> Result<(), PersistSaveError> {
    let path = settings_file().ok_or(PersistSaveError::StorageUnavailable)?;
    write_settings(&path, config)?;
    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}

fn read_settings(path: &Path) -> Option<AppConfig> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable settings file");
            None
        }
    }
}

fn write_settings(path: &Path, config: &AppConfig) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("fleet-watch-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn settings_survive_a_save() {
        let path = scratch_path();
        let config = AppConfig {
            api_base_url: "http://ops:8080".into(),
            request_timeout_secs: 45,
            ..AppConfig::default()
        };
        write_settings(&path, &config).unwrap();
        assert_eq!(read_settings(&path), Some(config));
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn corrupt_or_missing_file_reads_as_none() {
        let path = scratch_path();
        assert_eq!(read_settings(&path), None);

        write_settings(&path, &AppConfig::default()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_settings(&path), None);
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }
}
