//! Parser for the driver's companion `stats` file.
//!
//! Format: `seq=<n> pulses=<a,b,c,d,e> overruns=<a,b,c,d,e>`.  Unknown keys
//! are skipped so newer drivers can add counters without breaking the viewer.

use ranger_types::{RangerError, SensorStats};

/// Parse one `stats` line.
///
/// # Errors
///
/// Returns [`RangerError::MalformedInput`] when `seq`, `pulses` or
/// `overruns` is missing or not an unsigned integer (list).
pub fn parse_stats(line: &str) -> Result<SensorStats, RangerError> {
    let mut seq = None;
    let mut pulses = None;
    let mut overruns = None;

    for token in line.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key {
            "seq" => seq = Some(parse_u32(value)?),
            "pulses" => pulses = Some(parse_list(value)?),
            "overruns" => overruns = Some(parse_list(value)?),
            _ => {}
        }
    }

    Ok(SensorStats {
        seq: seq.ok_or_else(|| missing("seq"))?,
        pulses: pulses.ok_or_else(|| missing("pulses"))?,
        overruns: overruns.ok_or_else(|| missing("overruns"))?,
    })
}

fn parse_u32(value: &str) -> Result<u32, RangerError> {
    value.parse().map_err(|_| RangerError::MalformedInput {
        field: value.to_string(),
    })
}

fn parse_list(value: &str) -> Result<Vec<u32>, RangerError> {
    value
        .split(',')
        .filter(|v| !v.is_empty())
        .map(parse_u32)
        .collect()
}

fn missing(key: &str) -> RangerError {
    RangerError::MalformedInput {
        field: format!("{key}=<missing>"),
    }
}
