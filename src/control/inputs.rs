use crate::errors::SimulationError;
use crate::utils::units::parse_number;

/// The two user-editable quantities that drive both the top speed readout and
/// the acceleration curve request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceInputs {
    pub drag_area_m2: f64,
    pub power_kw: f64,
}

impl PerformanceInputs {
    pub fn new(drag_area_m2: f64, power_kw: f64) -> Self {
        PerformanceInputs {
            drag_area_m2,
            power_kw,
        }
    }

    /// Builds inputs from raw field text. Unparseable text becomes NaN.
    pub fn from_text(drag_area: &str, power: &str) -> Self {
        PerformanceInputs::new(parse_number(drag_area), parse_number(power))
    }

    pub fn is_valid(&self) -> bool {
        is_positive(self.drag_area_m2) && is_positive(self.power_kw)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !is_positive(self.drag_area_m2) {
            return Err(SimulationError::InvalidInput(format!(
                "drag area must be a positive number, got {}",
                self.drag_area_m2
            )));
        }
        if !is_positive(self.power_kw) {
            return Err(SimulationError::InvalidInput(format!(
                "power must be a positive number, got {}",
                self.power_kw
            )));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let inputs = PerformanceInputs::from_text("0.25", "200");
        assert_eq!(inputs, PerformanceInputs::new(0.25, 200.0));
        assert!(inputs.is_valid());
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_non_numeric_text_is_invalid() {
        let inputs = PerformanceInputs::from_text("abc", "200");
        assert!(inputs.drag_area_m2.is_nan());
        assert!(!inputs.is_valid());
        assert!(matches!(
            inputs.validate(),
            Err(SimulationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_positive_values_are_invalid() {
        assert!(!PerformanceInputs::new(0.0, 100.0).is_valid());
        assert!(!PerformanceInputs::new(0.5, -10.0).is_valid());
        assert!(!PerformanceInputs::new(f64::INFINITY, 100.0).is_valid());
    }
}
