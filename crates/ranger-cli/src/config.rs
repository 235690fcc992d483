//! Configuration file – reads/writes `~/.ranger/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use ranger_runtime::{DEFAULT_RATE_HZ, DEFAULT_SOURCE_PATH, SamplingLoopConfig};
use ranger_types::{PollConfig, Thresholds};

/// Persisted viewer settings stored in `~/.ranger/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Distances pseudo-file exported by the driver.
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Initial refresh rate in Hz.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    /// Stop threshold in metres.
    #[serde(default = "default_near")]
    pub near: f64,

    /// Turn-evaluation threshold in metres.
    #[serde(default = "default_far")]
    pub far: f64,

    /// Driver counters file, shown under the decision when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_path: Option<PathBuf>,

    /// Hide the warning banner once reads succeed again.
    #[serde(default)]
    pub clear_banner_on_recovery: bool,

    /// Where to write log output while the terminal is in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_source_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_PATH)
}
fn default_rate_hz() -> u32 {
    DEFAULT_RATE_HZ
}
fn default_near() -> f64 {
    Thresholds::default().near
}
fn default_far() -> f64 {
    Thresholds::default().far
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            rate_hz: default_rate_hz(),
            near: default_near(),
            far: default_far(),
            stats_path: None,
            clear_banner_on_recovery: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Build the sampling loop configuration these settings describe.
    pub fn sampling(&self) -> SamplingLoopConfig {
        SamplingLoopConfig {
            poll: PollConfig::new(&self.source_path, self.rate_hz),
            thresholds: Thresholds {
                near: self.near,
                far: self.far,
            },
            stats_path: self.stats_path.clone(),
            clear_banner_on_recovery: self.clear_banner_on_recovery,
        }
    }
}

/// Return the path to `~/.ranger/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".ranger").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `RANGER_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `RANGER_SOURCE` | `source_path` |
/// | `RANGER_RATE` | `rate_hz` (positive integers only) |
/// | `RANGER_STATS` | `stats_path` |
/// | `RANGER_LOG_FILE` | `log_file` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("RANGER_SOURCE") {
        cfg.source_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("RANGER_RATE")
        && let Ok(rate) = v.parse::<u32>()
        && rate > 0
    {
        cfg.rate_hz = rate;
    }
    if let Ok(v) = std::env::var("RANGER_STATS") {
        cfg.stats_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("RANGER_LOG_FILE") {
        cfg.log_file = Some(PathBuf::from(v));
    }
}

/// Save the config to disk, creating `~/.ranger/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}
