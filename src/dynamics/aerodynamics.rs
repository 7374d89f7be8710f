use crate::constants::AIR_DENSITY;

#[derive(Debug, Clone, Copy)]
pub struct Aerodynamics {
    pub drag_area: f64,
    pub air_density: f64,
}

impl Aerodynamics {
    pub fn new(drag_area: f64) -> Self {
        Aerodynamics {
            drag_area,
            air_density: AIR_DENSITY,
        }
    }

    pub fn with_air_density(drag_area: f64, air_density: f64) -> Self {
        Aerodynamics {
            drag_area,
            air_density,
        }
    }

    pub fn calculate_drag(&self, speed: f64) -> f64 {
        self.calculate_dynamic_pressure(speed) * self.drag_area
    }

    /// Power absorbed by drag at a steady speed, in watts.
    pub fn calculate_drag_power(&self, speed: f64) -> f64 {
        self.calculate_drag(speed) * speed
    }

    /// Speed in m/s at which drag power equals the supplied power in watts.
    pub fn calculate_terminal_speed(&self, power: f64) -> f64 {
        (power / (0.5 * self.drag_area * self.air_density)).cbrt()
    }

    fn calculate_dynamic_pressure(&self, speed: f64) -> f64 {
        0.5 * self.air_density * speed.powi(2)
    }
}
