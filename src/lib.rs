pub mod chart;
pub mod constants;
pub mod control;
pub mod dynamics;
pub mod errors;
pub mod remote;
pub mod settings;
pub mod utils;

pub use constants::*;
pub use settings::{ApiConfig, AppConfig};
pub use control::binding::{InputBinding, RefreshOutcome};
pub use control::fields::{Field, FieldRole, FormFields};
pub use control::inputs::PerformanceInputs;
pub use errors::SimulationError;

// Re-export commonly used items from dynamics
pub use dynamics::acceleration::{solve_accel, AccelerationSolver, SolverSettings};
pub use dynamics::aerodynamics::Aerodynamics;
pub use dynamics::curve::AccelerationCurve;
pub use dynamics::top_speed::{calc_topspeed, format_speed, TopSpeedCalculator};

// Re-export commonly used items from chart and remote
pub use chart::render::{render_svg, ChartOptions, ChartSink, SvgFileChart};
pub use remote::fetcher::AccelerationFetcher;
pub use remote::server::create_router;
