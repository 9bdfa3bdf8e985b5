//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name under the root folder
pub const DATABASE_FILE: &str = "quops.db";

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "QUOPS_ROOT_FOLDER";

/// Environment variables for the bootstrap admin credentials
pub const ADMIN_USER_ENV: &str = "QUOPS_ADMIN_USER";
pub const ADMIN_PASSWORD_ENV: &str = "QUOPS_ADMIN_PASSWORD";

/// Which ingestion path feeds the visualization dataset
///
/// The two paths produce differently shaped tables (multi-column vs
/// list-valued error mitigation), so downstream filtering branches on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Spreadsheet export fetched over HTTP (CSV with a banner header row)
    Sheet { sheet_id: String },
    /// Direct read of APPROVED rows from the submissions table
    Database,
}

/// Resolve the dataset source from the environment.
///
/// `QUOPS_DATA_SOURCE=sheet` selects the spreadsheet path and requires
/// `QUOPS_SHEET_ID`; anything else (including unset) selects the database
/// path.
pub fn resolve_data_source() -> Result<DataSource> {
    match std::env::var("QUOPS_DATA_SOURCE").as_deref() {
        Ok("sheet") => {
            let sheet_id = std::env::var("QUOPS_SHEET_ID").map_err(|_| {
                Error::Config("QUOPS_DATA_SOURCE=sheet requires QUOPS_SHEET_ID".to_string())
            })?;
            Ok(DataSource::Sheet { sheet_id })
        }
        _ => Ok(DataSource::Database),
    }
}

/// Export URL for a Google-Sheets-style spreadsheet id
pub fn sheet_export_url(sheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
        sheet_id
    )
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Database file path under the resolved root folder, creating the folder
/// if needed.
pub fn prepare_database_path(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join(DATABASE_FILE))
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/quops/config.toml first, then /etc/quops/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("quops").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/quops/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("quops").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("quops"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\quops"))
    } else {
        // ~/.local/share/quops on Linux, ~/Library/Application Support/quops on macOS
        dirs::data_local_dir()
            .map(|d| d.join("quops"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/quops"))
    }
}
