use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of ranger sensors wired on the array.
pub const SENSOR_COUNT: usize = 5;

/// Index of the forward-facing sensor.
pub const FRONT_SENSOR: usize = 2;

/// One parsed sample of the ranger array, in metres.
///
/// Indices 0 and 1 face left, 2 faces front, 3 and 4 face right.  Values are
/// kept exactly as the driver reported them; nothing is range-checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceReading(Vec<f64>);

impl DistanceReading {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for DistanceReading {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Navigation action derived from a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Stop,
    TurnLeft,
    TurnRight,
    Forward,
    NoData,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Stop => write!(f, "STOP"),
            Decision::TurnLeft => write!(f, "TURN LEFT"),
            Decision::TurnRight => write!(f, "TURN RIGHT"),
            Decision::Forward => write!(f, "FORWARD"),
            Decision::NoData => write!(f, "NO DATA"),
        }
    }
}

/// Distance cutoffs (metres) used by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Anything strictly closer than this on any sensor forces a stop.
    pub near: f64,
    /// Front distance below which the side clearances are compared.
    pub far: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            near: 0.40,
            far: 0.80,
        }
    }
}

/// Fastest allowed polling period (50 Hz).
pub const MIN_PERIOD: Duration = Duration::from_millis(20);
/// Slowest allowed polling period (1 Hz).
pub const MAX_PERIOD: Duration = Duration::from_secs(1);

const FASTER_FACTOR: f64 = 0.8;
const SLOWER_FACTOR: f64 = 1.25;

/// Where to read samples from and how often.
///
/// `source_path` is fixed for the life of the process; `period` is adjusted
/// at runtime and always stays within [`MIN_PERIOD`, `MAX_PERIOD`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    source_path: PathBuf,
    period: Duration,
}

impl PollConfig {
    /// Build a config polling `source_path` at `rate_hz` samples per second.
    /// A rate of zero is treated as 1 Hz; the resulting period is clamped.
    pub fn new(source_path: impl Into<PathBuf>, rate_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));
        Self {
            source_path: source_path.into(),
            period: clamp_period(period),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn rate_hz(&self) -> f64 {
        1.0 / self.period.as_secs_f64()
    }

    /// Shorten the period by 20 %, never below [`MIN_PERIOD`].
    pub fn faster(&mut self) {
        self.period = clamp_period(self.period.mul_f64(FASTER_FACTOR));
    }

    /// Lengthen the period by 25 %, never above [`MAX_PERIOD`].
    pub fn slower(&mut self) {
        self.period = clamp_period(self.period.mul_f64(SLOWER_FACTOR));
    }
}

fn clamp_period(period: Duration) -> Duration {
    period.clamp(MIN_PERIOD, MAX_PERIOD)
}

/// Counters exported by the driver next to the distances file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorStats {
    /// Driver-wide sample sequence number.
    pub seq: u32,
    /// Successfully measured echo pulses, per sensor.
    pub pulses: Vec<u32>,
    /// Falling edges seen without a matching rising edge, per sensor.
    pub overruns: Vec<u32>,
}

/// Every failure the viewer knows how to report.
///
/// The `Display` text of the source and parse variants is what ends up in the
/// on-screen warning banner.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangerError {
    #[error("Malformed CSV from sysfs")]
    MalformedInput { field: String },

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Permission denied. Try sudo or check file mode.")]
    PermissionDenied(String),

    #[error("Read error: {0}")]
    OtherReadFailure(String),

    #[error("Screen error: {0}")]
    Screen(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_display_matches_screen_labels() {
        assert_eq!(Decision::Stop.to_string(), "STOP");
        assert_eq!(Decision::TurnLeft.to_string(), "TURN LEFT");
        assert_eq!(Decision::TurnRight.to_string(), "TURN RIGHT");
        assert_eq!(Decision::Forward.to_string(), "FORWARD");
        assert_eq!(Decision::NoData.to_string(), "NO DATA");
    }

    #[test]
    fn decision_serializes_screaming_snake() {
        let json = serde_json::to_string(&Decision::TurnRight).unwrap();
        assert_eq!(json, "\"TURN_RIGHT\"");
        let back: Decision = serde_json::from_str("\"NO_DATA\"").unwrap();
        assert_eq!(back, Decision::NoData);
    }

    #[test]
    fn reading_serializes_as_plain_array() {
        let reading = DistanceReading::new(vec![0.5, 1.25]);
        assert_eq!(serde_json::to_string(&reading).unwrap(), "[0.5,1.25]");
    }

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert!((t.near - 0.40).abs() < f64::EPSILON);
        assert!((t.far - 0.80).abs() < f64::EPSILON);
    }

    #[test]
    fn poll_config_period_from_rate() {
        let cfg = PollConfig::new("/tmp/x", 10);
        assert_eq!(cfg.period(), Duration::from_millis(100));
        assert!((cfg.rate_hz() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn poll_config_initial_rate_is_clamped() {
        assert_eq!(PollConfig::new("/tmp/x", 0).period(), MAX_PERIOD);
        assert_eq!(PollConfig::new("/tmp/x", 1000).period(), MIN_PERIOD);
    }

    #[test]
    fn faster_never_goes_below_min_period() {
        let mut cfg = PollConfig::new("/tmp/x", 10);
        cfg.faster();
        assert_eq!(cfg.period(), Duration::from_millis(80));
        for _ in 0..100 {
            cfg.faster();
            assert!(cfg.period() >= MIN_PERIOD);
        }
        assert_eq!(cfg.period(), MIN_PERIOD);
    }

    #[test]
    fn slower_never_exceeds_max_period() {
        let mut cfg = PollConfig::new("/tmp/x", 10);
        cfg.slower();
        assert_eq!(cfg.period(), Duration::from_millis(125));
        for _ in 0..100 {
            cfg.slower();
            assert!(cfg.period() <= MAX_PERIOD);
        }
        assert_eq!(cfg.period(), MAX_PERIOD);
    }

    #[test]
    fn error_banner_text() {
        let err = RangerError::MalformedInput {
            field: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed CSV from sysfs");

        let err = RangerError::SourceNotFound("/sys/kernel/debug/ranger_k/distances".into());
        assert!(err.to_string().contains("ranger_k/distances"));

        let err = RangerError::PermissionDenied("/root/x".into());
        assert!(err.to_string().starts_with("Permission denied"));

        let err = RangerError::OtherReadFailure("Is a directory".into());
        assert_eq!(err.to_string(), "Read error: Is a directory");
    }
}
