use tracing::debug;

use crate::constants::{SIMULATION_FINAL_TIME, SIMULATION_INITIAL_VELOCITY, TIME_STEP};
use crate::control::inputs::PerformanceInputs;
use crate::dynamics::aerodynamics::Aerodynamics;
use crate::dynamics::curve::AccelerationCurve;
use crate::errors::SimulationError;
use crate::utils::units::kw_to_w;

// Sub-step control
const RELATIVE_TOLERANCE: f64 = 1e-7;
const STABILITY_FACTOR: f64 = 0.5; // sub-step * |da/dv|
const MIN_SUB_STEP: f64 = 1e-9; // s

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub final_time: f64,
    pub initial_velocity: f64,
    pub time_step: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            final_time: SIMULATION_FINAL_TIME,
            initial_velocity: SIMULATION_INITIAL_VELOCITY,
            time_step: TIME_STEP,
        }
    }
}

/// Straight-line acceleration under constant power against aerodynamic drag.
///
/// The state is `(position, velocity)`. Thrust is `power / velocity`, so the
/// run starts from a rolling velocity rather than from rest.
#[derive(Debug)]
pub struct AccelerationSolver {
    pub aerodynamics: Aerodynamics,
    pub power: f64,
    pub mass: f64,
    pub settings: SolverSettings,
}

impl AccelerationSolver {
    pub fn new(
        inputs: &PerformanceInputs,
        mass_kg: f64,
        settings: SolverSettings,
    ) -> Result<Self, SimulationError> {
        inputs.validate()?;
        if !(mass_kg.is_finite() && mass_kg > 0.0) {
            return Err(SimulationError::InvalidInput(format!(
                "mass must be a positive number, got {}",
                mass_kg
            )));
        }
        if !(settings.time_step > 0.0 && settings.final_time >= 0.0) {
            return Err(SimulationError::PhysicsError(format!(
                "time step {} and final time {} do not describe a forward run",
                settings.time_step, settings.final_time
            )));
        }
        if settings.initial_velocity <= 0.0 {
            return Err(SimulationError::PhysicsError(
                "initial velocity must be positive for a constant power model".to_string(),
            ));
        }

        Ok(AccelerationSolver {
            aerodynamics: Aerodynamics::new(inputs.drag_area_m2),
            power: kw_to_w(inputs.power_kw),
            mass: mass_kg,
            settings,
        })
    }

    pub fn calculate_acceleration(&self, velocity: f64) -> f64 {
        let net_power = self.power - self.aerodynamics.calculate_drag_power(velocity);
        net_power / (velocity * self.mass)
    }

    /// Magnitude of `da/dv`. The run is stiff while this is large, which is
    /// early on for a light or powerful vehicle.
    fn calculate_stiffness(&self, velocity: f64) -> f64 {
        let Aerodynamics {
            drag_area,
            air_density,
        } = self.aerodynamics;
        (self.power / velocity.powi(2) + air_density * drag_area * velocity.abs()) / self.mass
    }

    fn calculate_derivatives(&self, state: (f64, f64)) -> (f64, f64) {
        let (_position, velocity) = state;
        (velocity, self.calculate_acceleration(velocity))
    }

    fn step(&self, state: (f64, f64), delta_time: f64) -> (f64, f64) {
        let k1 = self.calculate_derivatives(state);
        let k2 = self.calculate_derivatives((
            state.0 + k1.0 * (delta_time / 2.0),
            state.1 + k1.1 * (delta_time / 2.0),
        ));
        let k3 = self.calculate_derivatives((
            state.0 + k2.0 * (delta_time / 2.0),
            state.1 + k2.1 * (delta_time / 2.0),
        ));
        let k4 = self.calculate_derivatives((
            state.0 + k3.0 * delta_time,
            state.1 + k3.1 * delta_time,
        ));

        (
            state.0 + (delta_time / 6.0) * (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0),
            state.1 + (delta_time / 6.0) * (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1),
        )
    }

    /// Integrates over one output interval with RK4 sub-steps. Each sub-step is
    /// checked against two half steps and shrunk until the velocity error is
    /// within tolerance; `sub_step` carries the accepted size to the next call.
    fn advance(
        &self,
        mut state: (f64, f64),
        interval: f64,
        sub_step: &mut f64,
    ) -> Result<(f64, f64), SimulationError> {
        let mut remaining = interval;
        while remaining > 0.0 {
            let h = sub_step.min(remaining);
            let full = self.step(state, h);
            let half = self.step(self.step(state, h / 2.0), h / 2.0);

            let error = (half.1 - full.1).abs() / 15.0;
            let tolerance = RELATIVE_TOLERANCE * half.1.abs().max(state.1.abs());
            let factor = if error > 0.0 {
                0.9 * (tolerance / error).powf(0.2)
            } else {
                2.0
            };

            if error.is_finite() && error <= tolerance && half.1 > 0.0 {
                state = half;
                remaining -= h;
                if h >= *sub_step {
                    *sub_step = h * factor.clamp(0.5, 2.0);
                }
            } else {
                *sub_step = if factor.is_finite() {
                    h * factor.clamp(0.1, 0.5)
                } else {
                    h * 0.1
                };
                if *sub_step < MIN_SUB_STEP {
                    return Err(SimulationError::PhysicsError(format!(
                        "acceleration run does not converge at {:.3} m/s",
                        state.1
                    )));
                }
            }
        }
        Ok(state)
    }

    /// Samples the run every `time_step`. Between samples the integrator
    /// picks its own sub-steps, so the samples stay accurate for light or
    /// powerful vehicles where a single fixed step would diverge.
    pub fn solve(&self) -> Result<AccelerationCurve, SimulationError> {
        let SolverSettings {
            final_time,
            initial_velocity,
            time_step,
        } = self.settings;
        let steps = (final_time / time_step).round() as usize;

        let mut time_s = Vec::with_capacity(steps + 1);
        let mut velocity_ms = Vec::with_capacity(steps + 1);
        let mut state = (0.0, initial_velocity);
        let mut sub_step =
            time_step.min(STABILITY_FACTOR / self.calculate_stiffness(initial_velocity));
        if sub_step.is_nan() || sub_step < MIN_SUB_STEP {
            return Err(SimulationError::PhysicsError(format!(
                "acceleration run is too stiff to solve (power {} W, mass {} kg)",
                self.power, self.mass
            )));
        }

        time_s.push(0.0);
        velocity_ms.push(state.1);
        for i in 1..=steps {
            state = self.advance(state, time_step, &mut sub_step)?;
            time_s.push(i as f64 * time_step);
            velocity_ms.push(state.1);
        }

        if let Some(bad) = velocity_ms.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(SimulationError::PhysicsError(format!(
                "acceleration run produced a non-physical velocity {}",
                bad
            )));
        }

        debug!(
            samples = time_s.len(),
            final_velocity = state.1,
            distance = state.0,
            final_sub_step = sub_step,
            "acceleration run solved"
        );

        Ok(AccelerationCurve {
            time_s,
            velocity_ms,
        })
    }
}

pub fn solve_accel(
    inputs: &PerformanceInputs,
    mass_kg: f64,
) -> Result<AccelerationCurve, SimulationError> {
    AccelerationSolver::new(inputs, mass_kg, SolverSettings::default())?.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::top_speed::calc_topspeed;
    use crate::utils::units::ms_to_kmh;
    use approx::assert_relative_eq;

    fn reference_inputs() -> PerformanceInputs {
        PerformanceInputs::new(0.5, 100.0)
    }

    #[test]
    fn test_acceleration_at_rolling_start() {
        let solver =
            AccelerationSolver::new(&reference_inputs(), 200.0, SolverSettings::default()).unwrap();

        assert_relative_eq!(solver.calculate_acceleration(10.0), 49.8375, epsilon = 1e-9);
    }

    #[test]
    fn test_curve_shape() {
        let curve = solve_accel(&reference_inputs(), 200.0).unwrap();

        assert_eq!(curve.len(), 201);
        assert_relative_eq!(curve.time_s[0], 0.0);
        assert_relative_eq!(curve.velocity_ms[0], 10.0);
        assert_relative_eq!(curve.duration(), 20.0, epsilon = 1e-9);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn test_velocity_rises_towards_top_speed() {
        let curve = solve_accel(&reference_inputs(), 200.0).unwrap();
        let top_speed = calc_topspeed(0.5, 100.0);

        for pair in curve.velocity_ms.windows(2) {
            assert!(pair[1] > pair[0], "velocity should increase: {:?}", pair);
        }
        let final_speed = ms_to_kmh(*curve.velocity_ms.last().unwrap());
        assert!(
            final_speed < top_speed,
            "final speed {} should stay below top speed {}",
            final_speed,
            top_speed
        );
        assert!(
            final_speed > 0.9 * top_speed,
            "after 20 s the run should be close to top speed, got {}",
            final_speed
        );
    }

    #[test]
    fn test_heavier_vehicle_accelerates_slower() {
        let light = solve_accel(&reference_inputs(), 200.0).unwrap();
        let heavy = solve_accel(&reference_inputs(), 800.0).unwrap();

        assert!(heavy.velocity_ms[10] < light.velocity_ms[10]);
    }

    #[test]
    fn test_starting_above_top_speed_decelerates() {
        let settings = SolverSettings {
            initial_velocity: 100.0,
            ..SolverSettings::default()
        };
        let solver = AccelerationSolver::new(&reference_inputs(), 200.0, settings).unwrap();

        let curve = solver.solve().unwrap();

        assert!(curve.velocity_ms[1] < 100.0);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(
            solve_accel(&PerformanceInputs::new(0.5, 100.0), 0.0),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            solve_accel(&PerformanceInputs::new(f64::NAN, 100.0), 200.0),
            Err(SimulationError::InvalidInput(_))
        ));

        let settings = SolverSettings {
            time_step: 0.0,
            ..SolverSettings::default()
        };
        assert!(matches!(
            AccelerationSolver::new(&reference_inputs(), 200.0, settings),
            Err(SimulationError::PhysicsError(_))
        ));

        let settings = SolverSettings {
            initial_velocity: 0.0,
            ..SolverSettings::default()
        };
        assert!(matches!(
            AccelerationSolver::new(&reference_inputs(), 200.0, settings),
            Err(SimulationError::PhysicsError(_))
        ));
    }

    // Plain fixed-step RK4 at a step far below anything the run needs.
    fn fine_reference(solver: &AccelerationSolver) -> Vec<f64> {
        let fine_step = 1e-4;
        let per_sample = (solver.settings.time_step / fine_step).round() as usize;
        let samples = (solver.settings.final_time / solver.settings.time_step).round() as usize;

        let mut state = (0.0, solver.settings.initial_velocity);
        let mut velocities = vec![state.1];
        for _ in 0..samples {
            for _ in 0..per_sample {
                state = solver.step(state, fine_step);
            }
            velocities.push(state.1);
        }
        velocities
    }

    fn max_relative_error(curve: &AccelerationCurve, reference: &[f64]) -> f64 {
        curve
            .velocity_ms
            .iter()
            .zip(reference)
            .map(|(v, r)| ((v - r) / r).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_high_power_to_mass_matches_fine_step_run() {
        for (cda, power_kw, mass_kg) in [(0.25, 1000.0, 200.0), (0.3, 100.0, 20.0)] {
            let solver = AccelerationSolver::new(
                &PerformanceInputs::new(cda, power_kw),
                mass_kg,
                SolverSettings::default(),
            )
            .unwrap();

            let curve = solver.solve().unwrap();
            let error = max_relative_error(&curve, &fine_reference(&solver));

            assert_eq!(curve.len(), 201);
            assert!(
                error < 1e-4,
                "cda {} power {} mass {}: relative error {}",
                cda,
                power_kw,
                mass_kg,
                error
            );
        }
    }

    #[test]
    fn test_featherweight_vehicle_stays_physical() {
        let curve = solve_accel(&PerformanceInputs::new(0.5, 100.0), 1.0).unwrap();
        let top_speed = calc_topspeed(0.5, 100.0);

        assert_eq!(curve.len(), 201);
        for pair in curve.velocity_ms.windows(2) {
            assert!(
                pair[1].is_finite() && pair[1] >= pair[0] * (1.0 - 1e-6),
                "{:?}",
                pair
            );
        }
        // A 1 kg vehicle is at top speed almost immediately.
        assert_relative_eq!(
            ms_to_kmh(curve.velocity_ms[1]),
            top_speed,
            max_relative = 1e-2
        );
        assert!(ms_to_kmh(*curve.velocity_ms.last().unwrap()) <= top_speed * (1.0 + 1e-9));
    }

    #[test]
    fn test_unsolvable_run_is_a_physics_error() {
        assert!(matches!(
            solve_accel(&PerformanceInputs::new(0.5, 1e300), 200.0),
            Err(SimulationError::PhysicsError(_))
        ));
    }
}
