use std::fs;
use std::path::PathBuf;

use plotters::prelude::*;
use tracing::debug;

use crate::constants::{CHART_HEIGHT, CHART_WIDTH};
use crate::dynamics::curve::AccelerationCurve;
use crate::errors::SimulationError;

pub const TIME_AXIS_LABEL: &str = "Time [s]";
pub const SPEED_AXIS_LABEL: &str = "Speed [km/h]";

/// Receives every curve that should become the visible chart.
pub trait ChartSink: Send + Sync {
    fn render(&self, curve: &AccelerationCurve, top_speed_kmh: f64) -> Result<(), SimulationError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub show_top_speed: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            show_top_speed: true,
        }
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> SimulationError {
    SimulationError::ChartError(err.to_string())
}

/// Renders the curve as a line+marker chart of speed (km/h) over time and
/// returns the SVG document. A non-finite `top_speed_kmh` suppresses the
/// reference line.
pub fn render_svg(
    curve: &AccelerationCurve,
    top_speed_kmh: f64,
    options: &ChartOptions,
) -> Result<String, SimulationError> {
    curve.validate()?;
    let points = curve.points_kmh();
    let show_top_speed = options.show_top_speed && top_speed_kmh.is_finite();

    let x_max = curve.duration().max(1.0);
    let mut y_max = curve.max_speed_kmh();
    if show_top_speed {
        y_max = y_max.max(top_speed_kmh);
    }
    let y_max = (y_max * 1.1).max(1.0);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut context = ChartBuilder::on(&root)
            .margin(15)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(chart_error)?;

        context
            .configure_mesh()
            .x_desc(TIME_AXIS_LABEL)
            .y_desc(SPEED_AXIS_LABEL)
            .draw()
            .map_err(chart_error)?;

        context
            .draw_series(LineSeries::new(points, BLUE.stroke_width(2)).point_size(3))
            .map_err(chart_error)?
            .label("Speed")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        if show_top_speed {
            context
                .draw_series(LineSeries::new(
                    vec![(0.0, top_speed_kmh), (x_max, top_speed_kmh)],
                    &RED,
                ))
                .map_err(chart_error)?
                .label("Calculated Topspeed")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        }

        context
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Writes each rendered chart to a file, replacing the previous one.
#[derive(Debug, Clone)]
pub struct SvgFileChart {
    pub path: PathBuf,
    pub options: ChartOptions,
}

impl SvgFileChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SvgFileChart {
            path: path.into(),
            options: ChartOptions::default(),
        }
    }
}

impl ChartSink for SvgFileChart {
    fn render(&self, curve: &AccelerationCurve, top_speed_kmh: f64) -> Result<(), SimulationError> {
        let svg = render_svg(curve, top_speed_kmh, &self.options)?;
        fs::write(&self.path, svg)?;
        debug!(path = %self.path.display(), samples = curve.len(), "chart written");
        Ok(())
    }
}
