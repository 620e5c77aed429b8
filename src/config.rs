use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SETTINGS_FILE: &str = "settings.json";

/// Runtime settings, read from `settings.json` in the user config dir.
/// Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulated backend round trip, in milliseconds.
    pub latency_ms: u64,
    /// Share of mutating backend calls that get rejected, in `[0, 1]`.
    pub failure_rate: f64,
    pub rng_seed: Option<u64>,
    pub seed_samples: bool,
    /// SQLite file; in-memory when unset.
    pub database_path: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            failure_rate: 0.1,
            rng_seed: None,
            seed_samples: true,
            database_path: None,
            export_dir: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let project_dirs = project_dirs()?;
        Self::load_from(&project_dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings: {}", path.display()))?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.failure_rate = if self.failure_rate.is_nan() {
            Self::default().failure_rate
        } else {
            self.failure_rate.clamp(0.0, 1.0)
        };
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Where exports land when no directory is picked.
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.clone().or_else(|| {
            directories::UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        })
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "fleetadmin", "fleet_admin")
        .ok_or_else(|| anyhow!("failed to resolve project directories"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create WebView2 data directory: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("fleet-admin-{name}-{nanos}"));
        std::fs::create_dir_all(&dir).expect("temp dir should be created");
        dir
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = temp_dir("settings-missing");
        let settings = Settings::load_from(&dir.join(SETTINGS_FILE)).expect("defaults");
        assert_eq!(settings, Settings::default());
        std::fs::remove_dir_all(&dir).expect("temp dir should be removed");
    }

    #[test]
    fn partial_file_keeps_defaults_and_clamps() {
        let dir = temp_dir("settings-partial");
        let path = dir.join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "latency_ms": 0, "failure_rate": 3.0, "rng_seed": 42 }"#)
            .expect("settings should be written");

        let settings = Settings::load_from(&path).expect("settings should parse");
        assert_eq!(settings.latency(), Duration::ZERO);
        assert_eq!(settings.failure_rate, 1.0);
        assert_eq!(settings.rng_seed, Some(42));
        assert!(settings.seed_samples);

        std::fs::remove_dir_all(&dir).expect("temp dir should be removed");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = temp_dir("settings-bad");
        let path = dir.join(SETTINGS_FILE);
        std::fs::write(&path, "not json").expect("settings should be written");

        let err = Settings::load_from(&path).expect_err("should fail to parse");
        assert!(format!("{err:#}").contains("failed to parse settings"));

        std::fs::remove_dir_all(&dir).expect("temp dir should be removed");
    }

    #[test]
    fn ensure_webview_data_dir_creates_webview2_subdir() {
        let dir = temp_dir("webview");
        let webview_dir =
            ensure_webview_data_dir(&dir).expect("webview data dir should be created");
        assert!(webview_dir.ends_with("webview2"));
        assert!(webview_dir.is_dir());
        std::fs::remove_dir_all(&dir).expect("temp dir should be removed");
    }
}
