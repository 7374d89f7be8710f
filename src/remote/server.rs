//! HTTP service that solves acceleration runs on request.
//!
//! Routes:
//! - `GET /accel-sol?power_kw=..&cda_m2=..&mass_kg=..` returns the curve as JSON
//! - `GET /accel-graph?power_kw=..&cda_m2=..&mass_kg=..` returns the curve as an SVG chart

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::chart::render::{render_svg, ChartOptions};
use crate::constants::{ACCEL_GRAPH_PATH, ACCEL_SOL_PATH};
use crate::control::inputs::PerformanceInputs;
use crate::dynamics::acceleration::solve_accel;
use crate::dynamics::top_speed::TopSpeedCalculator;
use crate::errors::SimulationError;

pub const EXAMPLE_SPEED_URL: &str = "Ex: /accel-sol?power_kw=200&mass_kg=200&cda_m2=0.25";
const REQUIRED_PARAMS: [&str; 3] = ["power_kw", "cda_m2", "mass_kg"];

/// Creates the router with all routes
pub fn create_router() -> Router {
    Router::new()
        .route(ACCEL_SOL_PATH, get(handle_accel_sol))
        .route(ACCEL_GRAPH_PATH, get(handle_accel_graph))
}

pub async fn serve(addr: SocketAddr) -> Result<(), SimulationError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "curve service listening");
    axum::serve(listener, create_router()).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct VehicleQuery {
    inputs: PerformanceInputs,
    mass_kg: f64,
}

fn parse_query(params: &HashMap<String, String>) -> Result<VehicleQuery, Response> {
    let mut values = [0.0; 3];
    for (slot, key) in values.iter_mut().zip(REQUIRED_PARAMS) {
        let raw = params.get(key).ok_or_else(|| {
            bad_request(format!(
                "You need to include all parameters to get a result!\n{}",
                EXAMPLE_SPEED_URL
            ))
        })?;
        *slot = raw.trim().parse::<f64>().map_err(|_| {
            bad_request(format!(
                "All input parameters must be able to be read as a number.\n{}",
                EXAMPLE_SPEED_URL
            ))
        })?;
    }
    let [power_kw, drag_area_m2, mass_kg] = values;

    Ok(VehicleQuery {
        inputs: PerformanceInputs::new(drag_area_m2, power_kw),
        mass_kg,
    })
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

fn unprocessable(err: SimulationError) -> Response {
    warn!(error = %err, "rejected acceleration request");
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
}

async fn handle_accel_sol(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = match parse_query(&params) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match solve_accel(&query.inputs, query.mass_kg) {
        Ok(curve) => Json(curve).into_response(),
        Err(e) => unprocessable(e),
    }
}

async fn handle_accel_graph(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = match parse_query(&params) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let top_speed = TopSpeedCalculator::default().top_speed_kmh(&query.inputs);
    let svg = solve_accel(&query.inputs, query.mass_kg)
        .and_then(|curve| render_svg(&curve, top_speed, &ChartOptions::default()));

    match svg {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => unprocessable(e),
    }
}
