//! Line parser for the ranger `distances` pseudo-file.
//!
//! The driver emits one line of comma-separated metres, e.g.
//! `0.412,1.030,0.877,2.500,0.390`.  Whitespace around fields and empty
//! fields are tolerated; any other junk rejects the whole line so that a
//! half-parsed reading can never drive a decision.

use ranger_types::{DistanceReading, RangerError};

/// Parse one CSV line into a [`DistanceReading`].
///
/// An empty or blank line is a valid, empty reading.
///
/// # Errors
///
/// Returns [`RangerError::MalformedInput`] carrying the first field that is
/// not a floating-point number.
pub fn parse_line(line: &str) -> Result<DistanceReading, RangerError> {
    line.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f64>().map_err(|_| RangerError::MalformedInput {
                field: field.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(DistanceReading::new)
}
