use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;
use crate::utils::units::ms_to_kmh;

/// Speed over time, as produced by the acceleration solver and carried over
/// the `/accel-sol` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationCurve {
    pub time_s: Vec<f64>,
    pub velocity_ms: Vec<f64>,
}

impl AccelerationCurve {
    pub fn new(time_s: Vec<f64>, velocity_ms: Vec<f64>) -> Result<Self, SimulationError> {
        let curve = AccelerationCurve {
            time_s,
            velocity_ms,
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.time_s.len() != self.velocity_ms.len() {
            return Err(SimulationError::MalformedCurve {
                time_len: self.time_s.len(),
                velocity_len: self.velocity_ms.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    pub fn speeds_kmh(&self) -> Vec<f64> {
        self.velocity_ms.iter().copied().map(ms_to_kmh).collect()
    }

    /// `(time_s, speed_kmh)` pairs ready for plotting.
    pub fn points_kmh(&self) -> Vec<(f64, f64)> {
        self.time_s
            .iter()
            .copied()
            .zip(self.speeds_kmh())
            .collect()
    }

    pub fn duration(&self) -> f64 {
        self.time_s.last().copied().unwrap_or(0.0)
    }

    pub fn max_speed_kmh(&self) -> f64 {
        self.speeds_kmh().into_iter().fold(0.0, f64::max)
    }
}
