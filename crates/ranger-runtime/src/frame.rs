//! [`Frame`] – everything shown for one tick, and how it is laid out.

use ranger_hal::Screen;
use ranger_types::{Decision, RangerError, SENSOR_COUNT, SensorStats};
use serde::Serialize;

pub const TITLE: &str = "Ultrasonic Ranger - Live TUI (debugfs)";
pub const HELP: &str = "q: quit    r: reload file    +/-: rate    space: clear error";

const ROW_TITLE: u16 = 0;
const ROW_SOURCE: u16 = 1;
const ROW_HELP: u16 = 2;
const ROW_RATE: u16 = 3;
const ROW_DISTANCES: u16 = 5;
const ROW_STALE: u16 = 11;
const ROW_DECISION: u16 = 12;
const ROW_WARNING: u16 = 15;
const ROW_STATS: u16 = 17;
const INDENT: u16 = 2;

/// One sensor's distance together with its position on the array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorDistance {
    pub index: usize,
    pub meters: f64,
}

/// Render request produced by the sampling loop each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub source_path: String,
    pub rate_hz: f64,
    /// At most [`SENSOR_COUNT`] entries, in sensor order.
    pub distances: Vec<SensorDistance>,
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Age of the displayed reading when this tick's read failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SensorStats>,
}

impl Frame {
    /// Pair up to [`SENSOR_COUNT`] leading values with their sensor index.
    pub fn indexed(values: &[f64]) -> Vec<SensorDistance> {
        values
            .iter()
            .take(SENSOR_COUNT)
            .enumerate()
            .map(|(index, &meters)| SensorDistance { index, meters })
            .collect()
    }

    /// Clear `screen`, draw the frame, and refresh.
    pub fn paint(&self, screen: &mut dyn Screen) -> Result<(), RangerError> {
        screen.clear()?;
        screen.write_at(ROW_TITLE, 0, TITLE)?;
        screen.write_at(ROW_SOURCE, 0, &format!("Source: {}", self.source_path))?;
        screen.write_at(ROW_HELP, 0, HELP)?;
        screen.write_at(ROW_RATE, 0, &format!("Rate: {:.1} Hz", self.rate_hz))?;

        screen.write_at(ROW_DISTANCES, 0, "Distances (m):")?;
        if self.distances.is_empty() {
            screen.write_at(ROW_DISTANCES + 1, INDENT, "(no data)")?;
        } else {
            for (row, d) in (ROW_DISTANCES + 1..).zip(&self.distances) {
                screen.write_at(row, INDENT, &format!("[{}] {:.3}", d.index, d.meters))?;
            }
            if let Some(ms) = self.stale_ms {
                let secs = ms as f64 / 1000.0;
                screen.write_at(
                    ROW_STALE,
                    INDENT,
                    &format!("(stale: last good reading {secs:.1} s ago)"),
                )?;
            }
        }

        screen.write_at(ROW_DECISION, 0, "Decision:")?;
        screen.write_at(ROW_DECISION + 1, INDENT, &self.decision.to_string())?;

        if let Some(banner) = &self.banner {
            screen.write_at(ROW_WARNING, 0, &format!("Warning: {banner}"))?;
        }

        if let Some(stats) = &self.stats {
            screen.write_at(ROW_STATS, 0, &format!("Sensor stats (seq {}):", stats.seq))?;
            screen.write_at(
                ROW_STATS + 1,
                INDENT,
                &format!("pulses:   {}", join(&stats.pulses)),
            )?;
            screen.write_at(
                ROW_STATS + 2,
                INDENT,
                &format!("overruns: {}", join(&stats.overruns)),
            )?;
        }

        screen.refresh()
    }
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_hal::MemoryScreen;

    fn frame() -> Frame {
        Frame {
            source_path: "/sys/kernel/debug/ranger_k/distances".to_string(),
            rate_hz: 10.0,
            distances: Frame::indexed(&[0.5, 0.6, 0.5, 0.6, 0.9]),
            decision: Decision::TurnRight,
            banner: None,
            stale_ms: None,
            stats: None,
        }
    }

    #[test]
    fn indexed_keeps_at_most_five() {
        let d = Frame::indexed(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(d.len(), 5);
        assert_eq!(d[4], SensorDistance { index: 4, meters: 5.0 });
    }

    #[test]
    fn paints_header_distances_and_decision() {
        let mut screen = MemoryScreen::new();
        frame().paint(&mut screen).unwrap();

        assert_eq!(screen.row(0), TITLE);
        assert_eq!(screen.row(1), "Source: /sys/kernel/debug/ranger_k/distances");
        assert_eq!(screen.row(3), "Rate: 10.0 Hz");
        assert_eq!(screen.row(6), "  [0] 0.500");
        assert_eq!(screen.row(10), "  [4] 0.900");
        assert_eq!(screen.row(13), "  TURN RIGHT");
        assert_eq!(screen.row(15), "");
        assert_eq!(screen.refresh_count(), 1);
    }

    #[test]
    fn paints_no_data_and_warning() {
        let mut f = frame();
        f.distances.clear();
        f.decision = Decision::NoData;
        f.banner = Some("Malformed CSV from sysfs".to_string());

        let mut screen = MemoryScreen::new();
        f.paint(&mut screen).unwrap();
        assert_eq!(screen.row(6), "  (no data)");
        assert_eq!(screen.row(13), "  NO DATA");
        assert_eq!(screen.row(15), "Warning: Malformed CSV from sysfs");
    }

    #[test]
    fn paints_stale_note_and_stats() {
        let mut f = frame();
        f.stale_ms = Some(1500);
        f.stats = Some(SensorStats {
            seq: 7,
            pulses: vec![1, 2, 3, 4, 5],
            overruns: vec![0, 0, 0, 0, 1],
        });

        let mut screen = MemoryScreen::new();
        f.paint(&mut screen).unwrap();
        assert_eq!(screen.row(11), "  (stale: last good reading 1.5 s ago)");
        assert_eq!(screen.row(17), "Sensor stats (seq 7):");
        assert_eq!(screen.row(18), "  pulses:   1, 2, 3, 4, 5");
        assert_eq!(screen.row(19), "  overruns: 0, 0, 0, 0, 1");
    }

    #[test]
    fn json_omits_absent_fields() {
        let json = serde_json::to_value(frame()).unwrap();
        assert_eq!(json["decision"], "TURN_RIGHT");
        assert_eq!(json["distances"][2]["index"], 2);
        assert!(json.get("banner").is_none());
        assert!(json.get("stats").is_none());
    }
}
