//! `ranger-runtime` – the sampling-and-decision engine.
//!
//! # Modules
//!
//! - [`parser`] – [`parse_line`][parser::parse_line]: turns one CSV line from
//!   the driver into a [`DistanceReading`][ranger_types::DistanceReading],
//!   rejecting the whole line if any field is not a number.
//! - [`decision`] – [`decide`][decision::decide]: pure mapping from distances
//!   to a [`Decision`][ranger_types::Decision].
//! - [`stats`] – [`parse_stats`][stats::parse_stats]: parser for the driver's
//!   pulse/overrun counters.
//! - [`frame`] – [`Frame`][frame::Frame]: the per-tick render request and its
//!   fixed screen layout.
//! - [`sampling_loop`] – [`SamplingLoop`][sampling_loop::SamplingLoop]: owns
//!   the polling rate, last-known-good reading and warning banner, and drives
//!   read → parse → decide → render → sleep.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber with an optional OTLP span exporter.

pub mod decision;
pub mod frame;
pub mod parser;
pub mod sampling_loop;
pub mod stats;
pub mod telemetry;

pub use decision::decide;
pub use frame::{Frame, SensorDistance};
pub use parser::parse_line;
pub use sampling_loop::{
    Command, DEFAULT_RATE_HZ, DEFAULT_SOURCE_PATH, SamplingLoop, SamplingLoopConfig, TickOutcome,
};
pub use stats::parse_stats;
pub use telemetry::{LogSink, TracerProviderGuard, init_tracing};
