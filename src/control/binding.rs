use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::chart::render::ChartSink;
use crate::control::fields::{FieldRole, FormFields};
use crate::control::inputs::PerformanceInputs;
use crate::dynamics::top_speed::{format_speed, TopSpeedCalculator};
use crate::remote::fetcher::AccelerationFetcher;
use crate::remote::tracker::RequestTracker;

/// What became of one chart refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered,
    /// A newer refresh was issued before this response arrived.
    Stale,
    Failed,
    /// Inputs were not positive numbers, so nothing was requested.
    Skipped,
}

struct ChartRefresher {
    fetcher: AccelerationFetcher,
    chart: Arc<dyn ChartSink>,
    tracker: RequestTracker,
    mass_kg: f64,
}

impl ChartRefresher {
    async fn refresh(
        &self,
        token: u64,
        inputs: PerformanceInputs,
        top_speed_kmh: f64,
    ) -> RefreshOutcome {
        if !inputs.is_valid() {
            warn!(?inputs, "inputs are not positive numbers, chart not refreshed");
            return RefreshOutcome::Skipped;
        }

        let Some(curve) = self.fetcher.fetch_logged(&inputs, self.mass_kg).await else {
            return RefreshOutcome::Failed;
        };

        let mut rendered = Ok(());
        let applied = self.tracker.apply_if_current(token, || {
            rendered = self.chart.render(&curve, top_speed_kmh);
        });
        if !applied {
            debug!(token, latest = self.tracker.latest(), "discarding stale curve");
            return RefreshOutcome::Stale;
        }

        match rendered {
            Ok(()) => RefreshOutcome::Rendered,
            Err(e) => {
                error!(error = %e, "failed to render acceleration curve");
                RefreshOutcome::Failed
            }
        }
    }
}

/// Wires the form fields to the top speed readout and the acceleration chart.
///
/// Every edit recomputes the readout synchronously and then starts one chart
/// refresh on the tokio runtime, so `on_input` must be called from within a
/// runtime.
pub struct InputBinding {
    fields: FormFields,
    calculator: TopSpeedCalculator,
    refresher: Arc<ChartRefresher>,
}

impl InputBinding {
    pub fn new(
        fields: FormFields,
        fetcher: AccelerationFetcher,
        chart: Arc<dyn ChartSink>,
        mass_kg: f64,
    ) -> Self {
        InputBinding {
            fields,
            calculator: TopSpeedCalculator::default(),
            refresher: Arc::new(ChartRefresher {
                fetcher,
                chart,
                tracker: RequestTracker::new(),
                mass_kg,
            }),
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn on_input(&self, role: FieldRole, text: &str) -> JoinHandle<RefreshOutcome> {
        self.fields.input(role).set_value(text);
        self.update()
    }

    pub fn update(&self) -> JoinHandle<RefreshOutcome> {
        let (inputs, top_speed_kmh) = self.recompute();
        // Issued before spawning so tokens follow edit order.
        let token = self.refresher.tracker.issue();
        let refresher = Arc::clone(&self.refresher);
        tokio::spawn(async move { refresher.refresh(token, inputs, top_speed_kmh).await })
    }

    /// Reads the input fields and writes the formatted top speed.
    pub fn recompute(&self) -> (PerformanceInputs, f64) {
        let inputs =
            PerformanceInputs::from_text(&self.fields.drag_area.value(), &self.fields.power.value());
        let top_speed_kmh = self.calculator.top_speed_kmh(&inputs);
        self.fields.top_speed.set_value(format_speed(top_speed_kmh));
        debug!(?inputs, top_speed_kmh, "top speed recomputed");
        (inputs, top_speed_kmh)
    }
}
