//! [`SamplingLoop`] – the read → parse → decide → render cycle.
//!
//! Each tick:
//!
//! 1. **Input** – poll one key from the [`Screen`] without blocking and map
//!    it to a [`Command`] (quit, rate up/down, reload, clear warning).
//! 2. **Read** – fetch the first line of the source through the
//!    [`LineSource`] and hand it to [`parse_line`].
//! 3. **Remember** – a good reading replaces the last-known-good one; any
//!    failure sets the warning banner and keeps the previous reading on
//!    screen.
//! 4. **Decide** – run [`decide`] over whatever is being displayed.
//! 5. **Render** – build a [`Frame`] and paint it.
//! 6. **Sleep** – wait out the rest of the period.
//!
//! The warning banner is sticky: a later good read does not hide an earlier
//! problem until the operator presses space, unless
//! [`SamplingLoopConfig::clear_banner_on_recovery`] is set.
//!
//! # Example
//!
//! ```rust
//! use ranger_hal::{MemoryScreen, ScriptedSource};
//! use ranger_runtime::sampling_loop::{SamplingLoop, SamplingLoopConfig, TickOutcome};
//! use ranger_types::PollConfig;
//!
//! let config = SamplingLoopConfig {
//!     poll: PollConfig::new("/dev/ranger", 10),
//!     ..SamplingLoopConfig::default()
//! };
//! let source = ScriptedSource::new().with_line("/dev/ranger", "1,1,1,1,1");
//! let mut sampler = SamplingLoop::new(config, Box::new(source));
//!
//! let mut screen = MemoryScreen::new();
//! assert_eq!(sampler.tick(&mut screen).unwrap(), TickOutcome::Continue);
//! assert_eq!(screen.row(13), "  FORWARD");
//! ```

use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use ranger_hal::{LineSource, Screen};
use ranger_types::{Decision, DistanceReading, PollConfig, RangerError, SensorStats, Thresholds};
use tracing::{debug, info, warn};

use crate::decision::decide;
use crate::frame::Frame;
use crate::parser::parse_line;
use crate::stats::parse_stats;

/// Where the ranger driver publishes its distances.
pub const DEFAULT_SOURCE_PATH: &str = "/sys/kernel/debug/ranger_k/distances";

/// Refresh rate used when none is configured.
pub const DEFAULT_RATE_HZ: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Operator commands accepted between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Faster,
    Slower,
    /// Re-read the source.  Every tick already does, so this only exists to
    /// acknowledge the key.
    Reload,
    ClearBanner,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' => Some(Command::Quit),
            '+' => Some(Command::Faster),
            '-' => Some(Command::Slower),
            'r' => Some(Command::Reload),
            ' ' => Some(Command::ClearBanner),
            _ => None,
        }
    }
}

/// Whether the loop should keep going after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration bundle for [`SamplingLoop`].
#[derive(Debug, Clone)]
pub struct SamplingLoopConfig {
    /// Source path and initial polling period.
    pub poll: PollConfig,
    /// Decision cutoffs.
    pub thresholds: Thresholds,
    /// Optional driver `stats` file shown below the decision.
    pub stats_path: Option<PathBuf>,
    /// Drop the warning banner as soon as a good reading arrives.
    pub clear_banner_on_recovery: bool,
}

impl Default for SamplingLoopConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::new(DEFAULT_SOURCE_PATH, DEFAULT_RATE_HZ),
            thresholds: Thresholds::default(),
            stats_path: None,
            clear_banner_on_recovery: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SamplingLoop
// ─────────────────────────────────────────────────────────────────────────────

struct LastKnownGood {
    reading: DistanceReading,
    received_at: Instant,
}

/// Owns all per-process viewer state and drives it one tick at a time.
pub struct SamplingLoop {
    source: Box<dyn LineSource>,
    poll: PollConfig,
    thresholds: Thresholds,
    stats_path: Option<PathBuf>,
    clear_banner_on_recovery: bool,
    last_good: Option<LastKnownGood>,
    banner: String,
    /// `true` while reads keep failing; used to log transitions only once.
    failing: bool,
    shutdown: Arc<AtomicBool>,
}

impl SamplingLoop {
    pub fn new(config: SamplingLoopConfig, source: Box<dyn LineSource>) -> Self {
        Self {
            source,
            poll: config.poll,
            thresholds: config.thresholds,
            stats_path: config.stats_path,
            clear_banner_on_recovery: config.clear_banner_on_recovery,
            last_good: None,
            banner: String::new(),
            failing: false,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use `flag` as the shutdown signal checked before every tick.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Current warning text, if any.
    pub fn banner(&self) -> Option<&str> {
        (!self.banner.is_empty()).then_some(self.banner.as_str())
    }

    pub fn last_good(&self) -> Option<&DistanceReading> {
        self.last_good.as_ref().map(|g| &g.reading)
    }

    /// Apply an operator command.
    pub fn apply(&mut self, command: Command) -> TickOutcome {
        match command {
            Command::Quit => return TickOutcome::Quit,
            Command::Faster => {
                self.poll.faster();
                info!(rate_hz = self.poll.rate_hz(), "refresh rate increased");
            }
            Command::Slower => {
                self.poll.slower();
                info!(rate_hz = self.poll.rate_hz(), "refresh rate decreased");
            }
            Command::Reload => debug!("reload requested"),
            Command::ClearBanner => self.banner.clear(),
        }
        TickOutcome::Continue
    }

    /// Read the source once and build the frame to display.
    pub fn sample(&mut self) -> Frame {
        self.sample_at(Instant::now())
    }

    /// [`sample`][Self::sample] with an explicit clock reading.
    pub fn sample_at(&mut self, now: Instant) -> Frame {
        let path = self.poll.source_path().to_path_buf();
        let fresh = match self
            .source
            .read_first_line(&path)
            .and_then(|line| parse_line(&line))
        {
            Ok(reading) => {
                self.record_success(&reading, now);
                Some(reading)
            }
            Err(err) => {
                self.record_failure(&err);
                None
            }
        };
        let stats = self.read_stats();

        let stale_ms = match (&fresh, &self.last_good) {
            (None, Some(good)) => Some(
                u64::try_from(now.saturating_duration_since(good.received_at).as_millis())
                    .unwrap_or(u64::MAX),
            ),
            _ => None,
        };
        let shown = fresh
            .as_ref()
            .or(self.last_good.as_ref().map(|g| &g.reading));

        let decision = match shown {
            Some(reading) => decide(reading.as_slice(), &self.thresholds),
            None => Decision::NoData,
        };
        debug!(?decision, fresh = fresh.is_some(), "tick");

        Frame {
            source_path: path.display().to_string(),
            rate_hz: self.poll.rate_hz(),
            distances: shown.map(|r| Frame::indexed(r.as_slice())).unwrap_or_default(),
            decision,
            banner: self.banner().map(str::to_string),
            stale_ms,
            stats,
        }
    }

    /// Run one full tick against `screen`.
    ///
    /// # Errors
    ///
    /// Only [`RangerError::Screen`] failures propagate; source and parse
    /// failures are absorbed into the banner.
    pub fn tick(&mut self, screen: &mut dyn Screen) -> Result<TickOutcome, RangerError> {
        if let Some(command) = screen.poll_key()?.and_then(Command::from_key)
            && self.apply(command) == TickOutcome::Quit
        {
            return Ok(TickOutcome::Quit);
        }
        self.sample().paint(screen)?;
        Ok(TickOutcome::Continue)
    }

    /// Tick until the operator quits or the shutdown flag is raised.
    ///
    /// # Errors
    ///
    /// Returns the first [`RangerError::Screen`] failure.
    pub fn run(&mut self, screen: &mut dyn Screen) -> Result<(), RangerError> {
        info!(
            source = %self.poll.source_path().display(),
            rate_hz = self.poll.rate_hz(),
            "sampling loop started"
        );
        loop {
            let started = Instant::now();
            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown requested");
                break;
            }
            if self.tick(screen)? == TickOutcome::Quit {
                info!("operator quit");
                break;
            }
            let remaining = self.poll.period().saturating_sub(started.elapsed());
            if remaining > Duration::ZERO {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }

    // ── internal helpers ─────────────────────────────────────────────────────

    fn record_success(&mut self, reading: &DistanceReading, now: Instant) {
        if self.failing {
            info!("sensor source recovered");
            self.failing = false;
            if self.clear_banner_on_recovery {
                self.banner.clear();
            }
        }
        self.last_good = Some(LastKnownGood {
            reading: reading.clone(),
            received_at: now,
        });
    }

    fn record_failure(&mut self, err: &RangerError) {
        let message = err.to_string();
        if !self.failing || message != self.banner {
            warn!(error = %err, detail = ?err, "sensor read failed");
        }
        self.failing = true;
        self.banner = message;
    }

    fn read_stats(&mut self) -> Option<SensorStats> {
        let path = self.stats_path.as_ref()?;
        match self
            .source
            .read_first_line(path)
            .and_then(|line| parse_stats(&line))
        {
            Ok(stats) => Some(stats),
            Err(err) => {
                debug!(error = %err, "stats unavailable");
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
