// Physical Constants
pub const AIR_DENSITY: f64 = 1.3; // kg/m³ (sea-level air)

// Conversions
pub const KW_TO_W: f64 = 1000.0; // W per kW
pub const MS_TO_KMH: f64 = 3.6; // km/h per m/s

// Display
pub const SPEED_DECIMAL_PLACES: usize = 2;

// Vehicle Constants
pub const DEFAULT_MASS_KG: f64 = 200.0; // kg

// Simulation Parameters
pub const SIMULATION_FINAL_TIME: f64 = 20.0; // s
pub const SIMULATION_INITIAL_VELOCITY: f64 = 10.0; // m/s
pub const TIME_STEP: f64 = 0.1; // s

// Remote Endpoint
pub const DEFAULT_API_HOST: &str = "http://127.0.0.1:8123";
pub const ACCEL_SOL_PATH: &str = "/accel-sol";
pub const ACCEL_GRAPH_PATH: &str = "/accel-graph";

// Chart
pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;
