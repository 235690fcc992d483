//! Command-line arguments for `ranger-tui`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "ranger-tui",
    version,
    about = "Live terminal viewer for the ultrasonic ranger array"
)]
pub struct Cli {
    /// Distances file exported by the driver
    #[arg(long = "sysfs", value_name = "PATH")]
    pub sysfs: Option<PathBuf>,

    /// UI refresh rate in Hz
    #[arg(long, value_name = "HZ", value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: Option<u32>,

    /// Stop when any sensor is closer than this (metres)
    #[arg(long, value_name = "M")]
    pub near: Option<f64>,

    /// Compare side clearance when the front is closer than this (metres)
    #[arg(long, value_name = "M")]
    pub far: Option<f64>,

    /// Driver stats file to show below the decision
    #[arg(long, value_name = "PATH")]
    pub stats: Option<PathBuf>,

    /// Hide the warning banner as soon as reads succeed again
    #[arg(long)]
    pub clear_on_recovery: bool,

    /// Write log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Read a single sample, print it as JSON and exit
    #[arg(long)]
    pub once: bool,

    /// Save the effective settings to ~/.ranger/config.toml and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Overlay every flag the user actually passed onto `cfg`.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(path) = &self.sysfs {
            cfg.source_path = path.clone();
        }
        if let Some(rate) = self.rate {
            cfg.rate_hz = rate;
        }
        if let Some(near) = self.near {
            cfg.near = near;
        }
        if let Some(far) = self.far {
            cfg.far = far;
        }
        if let Some(path) = &self.stats {
            cfg.stats_path = Some(path.clone());
        }
        if self.clear_on_recovery {
            cfg.clear_banner_on_recovery = true;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_leave_config_untouched() {
        let cli = Cli::try_parse_from(["ranger-tui"]).unwrap();
        let mut cfg = Config {
            rate_hz: 42,
            ..Config::default()
        };
        cli.apply(&mut cfg);
        assert_eq!(cfg.rate_hz, 42);
        assert!(!cli.once);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "ranger-tui",
            "--sysfs",
            "/tmp/d",
            "--rate",
            "5",
            "--near",
            "0.3",
            "--far",
            "1.2",
            "--stats",
            "/tmp/s",
            "--clear-on-recovery",
            "--log-file",
            "/tmp/l",
        ])
        .unwrap();
        let mut cfg = Config::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.source_path, PathBuf::from("/tmp/d"));
        assert_eq!(cfg.rate_hz, 5);
        assert!((cfg.near - 0.3).abs() < f64::EPSILON);
        assert!((cfg.far - 1.2).abs() < f64::EPSILON);
        assert_eq!(cfg.stats_path, Some(PathBuf::from("/tmp/s")));
        assert!(cfg.clear_banner_on_recovery);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/l")));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(Cli::try_parse_from(["ranger-tui", "--rate", "0"]).is_err());
    }

    #[test]
    fn mode_flags() {
        let cli = Cli::try_parse_from(["ranger-tui", "--once", "--write-config"]).unwrap();
        assert!(cli.once);
        assert!(cli.write_config);
    }
}
