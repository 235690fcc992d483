//! Decision engine: five distances in, one navigation action out.
//!
//! Rules, evaluated in order:
//!
//! 1. fewer than three values → [`Decision::NoData`]
//! 2. any value below `near` → [`Decision::Stop`]
//! 3. front below `far` → turn towards the side with the larger mean
//!    clearance (ties turn right); needs all five values, otherwise
//!    [`Decision::NoData`]
//! 4. otherwise → [`Decision::Forward`]

use ranger_types::{Decision, FRONT_SENSOR, SENSOR_COUNT, Thresholds};

/// Derive the navigation action for `distances` under `thresholds`.
pub fn decide(distances: &[f64], thresholds: &Thresholds) -> Decision {
    if distances.len() <= FRONT_SENSOR {
        return Decision::NoData;
    }

    if distances.iter().any(|&d| d < thresholds.near) {
        return Decision::Stop;
    }

    if distances[FRONT_SENSOR] < thresholds.far {
        if distances.len() < SENSOR_COUNT {
            return Decision::NoData;
        }
        let left_space = (distances[0] + distances[1]) / 2.0;
        let right_space = (distances[3] + distances[4]) / 2.0;
        return if left_space > right_space {
            Decision::TurnLeft
        } else {
            Decision::TurnRight
        };
    }

    Decision::Forward
}
