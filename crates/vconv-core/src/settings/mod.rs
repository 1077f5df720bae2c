//! Settings Persistence System
//!
//! Provides persistent application settings with:
//! - Atomic file writes (temp file + rename)
//! - Normalization that repairs bad values instead of failing
//! - Migration support for schema changes
//!
//! Storage location: {config_dir}/vconv/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::conversion::ContainerFormat;
use crate::{CoreError, CoreResult};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Lock file name (advisory lock to prevent concurrent writers)
pub const SETTINGS_LOCK_FILE: &str = "settings.json.lock";

/// Application directory name under the platform config/data dirs
pub const APP_DIR_NAME: &str = "vconv";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// FFmpeg location
    #[serde(default)]
    pub ffmpeg: FfmpegSettings,

    /// Conversion defaults
    #[serde(default)]
    pub conversion: ConversionSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            ffmpeg: FfmpegSettings::default(),
            conversion: ConversionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppSettings {
    /// Normalizes settings so persisted state is always valid.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.ffmpeg.path = self
            .ffmpeg
            .path
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        self.conversion.default_format = normalize_enum(
            &self.conversion.default_format,
            &ContainerFormat::tokens(),
            default_output_format(),
        );

        self.logging.level =
            normalize_enum(&self.logging.level, LOG_LEVELS, default_log_level());
        self.logging.directory = self
            .logging
            .directory
            .take()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    /// Default output format, already validated by [`AppSettings::normalize`]
    pub fn default_format(&self) -> ContainerFormat {
        self.conversion
            .default_format
            .parse()
            .unwrap_or_default()
    }

    /// Configured FFmpeg path, if any
    pub fn ffmpeg_path(&self) -> Option<PathBuf> {
        self.ffmpeg.path.as_ref().map(PathBuf::from)
    }

    /// Log directory, falling back to the platform data dir
    pub fn log_dir(&self) -> PathBuf {
        match &self.logging.directory {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir(),
        }
    }
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    let value = value.trim();
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

/// FFmpeg settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FfmpegSettings {
    /// Explicit FFmpeg binary; `None` means look it up on PATH
    #[serde(default)]
    pub path: Option<String>,
}

/// Conversion settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Format preselected when none is given (mp4, avi, mov, wmv)
    #[serde(default = "default_output_format")]
    pub default_format: String,
}

fn default_output_format() -> String {
    ContainerFormat::default().as_str().to_string()
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            default_format: default_output_format(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// Minimum level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

/// Platform config directory for vconv (e.g. `~/.config/vconv`)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Platform log directory for vconv (e.g. `~/.local/share/vconv/logs`)
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("logs")
}

/// Settings manager for loading, saving, and resetting settings
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a new settings manager storing its file in `config_dir`
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            settings_path: config_dir.join(SETTINGS_FILE),
        }
    }

    /// Settings manager for the platform config directory
    pub fn with_default_dir() -> Self {
        Self::new(default_config_dir())
    }

    fn lock_path(&self) -> PathBuf {
        self.settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_LOCK_FILE)
    }

    fn with_lock<T>(&self, exclusive: bool, op: impl FnOnce() -> CoreResult<T>) -> CoreResult<T> {
        // The lock file lives next to the settings file.
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::SettingsError(format!("Failed to create settings directory: {}", e))
            })?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| {
                CoreError::SettingsError(format!("Failed to open settings lock file: {}", e))
            })?;

        let locked = if exclusive {
            fs2::FileExt::lock_exclusive(&lock_file)
        } else {
            fs2::FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|e| {
            CoreError::SettingsError(format!("Failed to lock settings file: {}", e))
        })?;

        let result = op();

        if let Err(e) = fs2::FileExt::unlock(&lock_file) {
            warn!("Failed to unlock settings lock file: {}", e);
        }

        result
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, returning defaults if missing or unreadable
    pub fn load(&self) -> AppSettings {
        let result = self.with_lock(false, || {
            if !self.settings_path.exists() {
                info!("Settings file not found, using defaults");
                return Ok(AppSettings::default());
            }

            let content = fs::read_to_string(&self.settings_path)?;
            let mut settings = serde_json::from_str::<AppSettings>(&content)?;

            if settings.version < SETTINGS_VERSION {
                info!(
                    "Migrating settings from version {} to {}",
                    settings.version, SETTINGS_VERSION
                );
                settings = self.migrate(settings);
            }

            settings.normalize();
            Ok(settings)
        });

        match result {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                AppSettings::default()
            }
        }
    }

    /// Save settings to disk using atomic write (temp file + rename)
    pub fn save(&self, settings: &AppSettings) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            let mut normalized = settings.clone();
            normalized.normalize();

            let content = serde_json::to_string_pretty(&normalized)?;

            let temp_path = self.settings_path.with_extension("json.tmp");
            if temp_path.exists() {
                let _ = fs::remove_file(&temp_path);
            }

            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            drop(file);

            if cfg!(windows) {
                // rename does not overwrite on Windows: backup, swap, then clean up.
                let backup_path = self.settings_path.with_extension("json.bak");
                if backup_path.exists() {
                    let _ = fs::remove_file(&backup_path);
                }

                if self.settings_path.exists() {
                    fs::rename(&self.settings_path, &backup_path)?;
                }

                if let Err(e) = fs::rename(&temp_path, &self.settings_path) {
                    if backup_path.exists() {
                        let _ = fs::rename(&backup_path, &self.settings_path);
                    }
                    return Err(CoreError::SettingsError(format!(
                        "Failed to finalize settings file: {}",
                        e
                    )));
                }

                if backup_path.exists() {
                    let _ = fs::remove_file(&backup_path);
                }
            } else {
                fs::rename(&temp_path, &self.settings_path)?;
            }

            info!("Settings saved to {:?}", self.settings_path);
            Ok(normalized)
        })
    }

    /// Reset settings to defaults and delete the settings file
    pub fn reset(&self) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            if self.settings_path.exists() {
                fs::remove_file(&self.settings_path)?;
                info!("Settings file deleted");
            }
            Ok(AppSettings::default())
        })
    }

    /// Migrate settings from an older schema version
    fn migrate(&self, mut settings: AppSettings) -> AppSettings {
        settings.version = SETTINGS_VERSION;
        settings
    }
}
