use crate::constants::{AIR_DENSITY, SPEED_DECIMAL_PLACES};
use crate::control::inputs::PerformanceInputs;
use crate::dynamics::aerodynamics::Aerodynamics;
use crate::errors::SimulationError;
use crate::utils::units::{kw_to_w, ms_to_kmh};

/// Closed-form top speed: the speed at which engine power equals aerodynamic
/// drag power.
///
/// `speed_kmh = 3.6 * cbrt(power_kw * 1000 / (0.5 * cda * rho))`
#[derive(Debug, Clone, Copy)]
pub struct TopSpeedCalculator {
    pub air_density: f64,
}

impl Default for TopSpeedCalculator {
    fn default() -> Self {
        TopSpeedCalculator {
            air_density: AIR_DENSITY,
        }
    }
}

impl TopSpeedCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns NaN when either input is non-positive or not a number.
    pub fn top_speed_kmh(&self, inputs: &PerformanceInputs) -> f64 {
        if !inputs.is_valid() {
            return f64::NAN;
        }
        let aero = Aerodynamics::with_air_density(inputs.drag_area_m2, self.air_density);
        ms_to_kmh(aero.calculate_terminal_speed(kw_to_w(inputs.power_kw)))
    }

    pub fn try_top_speed_kmh(&self, inputs: &PerformanceInputs) -> Result<f64, SimulationError> {
        inputs.validate()?;
        Ok(self.top_speed_kmh(inputs))
    }
}

pub fn calc_topspeed(drag_area_m2: f64, power_kw: f64) -> f64 {
    TopSpeedCalculator::default().top_speed_kmh(&PerformanceInputs::new(drag_area_m2, power_kw))
}

/// Formats a speed for the read-only output field.
pub fn format_speed(speed_kmh: f64) -> String {
    format!("{:.*}", SPEED_DECIMAL_PLACES, speed_kmh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_unit_drag_area_hundred_kilowatts() {
        let expected = 3.6 * (100_000.0_f64 / 0.65).cbrt();

        assert_relative_eq!(calc_topspeed(1.0, 100.0), expected, epsilon = EPSILON);
        assert_relative_eq!(calc_topspeed(1.0, 100.0), 192.9, epsilon = 0.01);
    }

    #[test]
    fn test_reference_vehicle() {
        assert_relative_eq!(calc_topspeed(0.5, 100.0), 243.0382972244989, epsilon = EPSILON);
    }

    #[test]
    fn test_doubling_power() {
        let base = calc_topspeed(0.4, 75.0);
        let doubled = calc_topspeed(0.4, 150.0);

        assert_relative_eq!(doubled / base, 2.0_f64.cbrt(), epsilon = EPSILON);
    }

    #[test]
    fn test_doubling_drag_area() {
        let base = calc_topspeed(0.4, 75.0);
        let doubled = calc_topspeed(0.8, 75.0);

        assert_relative_eq!(doubled / base, 2.0_f64.powf(-1.0 / 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_invalid_inputs_are_nan() {
        assert!(calc_topspeed(0.0, 100.0).is_nan());
        assert!(calc_topspeed(-0.5, 100.0).is_nan());
        assert!(calc_topspeed(0.5, f64::NAN).is_nan());
    }

    #[test]
    fn test_checked_variant_reports_invalid_input() {
        let calculator = TopSpeedCalculator::new();

        let err = calculator
            .try_top_speed_kmh(&PerformanceInputs::new(0.5, 0.0))
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));

        let ok = calculator
            .try_top_speed_kmh(&PerformanceInputs::new(0.5, 100.0))
            .unwrap();
        assert_relative_eq!(ok, 243.0382972244989, epsilon = EPSILON);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(243.0382972244989), "243.04");
        assert_eq!(format_speed(36.0), "36.00");
        assert_eq!(format_speed(f64::NAN), "NaN");
    }
}
