//! Client for the `/accel-sol` endpoint.
//!
//! ```ignore
//! let fetcher = AccelerationFetcher::new(ApiConfig::new("http://127.0.0.1:8123"));
//! let curve = fetcher.fetch(&PerformanceInputs::new(0.25, 200.0), 200.0).await?;
//! ```

use reqwest::Url;
use tracing::{debug, error, warn};

use crate::constants::ACCEL_SOL_PATH;
use crate::control::inputs::PerformanceInputs;
use crate::dynamics::curve::AccelerationCurve;
use crate::errors::SimulationError;
use crate::settings::ApiConfig;

pub struct AccelerationFetcher {
    client: reqwest::Client,
    config: ApiConfig,
}

impl AccelerationFetcher {
    pub fn new(config: ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tpspd/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to a default HTTP client");
                reqwest::Client::new()
            });

        AccelerationFetcher { client, config }
    }

    pub fn request_url(
        &self,
        inputs: &PerformanceInputs,
        mass_kg: f64,
    ) -> Result<Url, SimulationError> {
        let base = format!(
            "{}{}",
            self.config.api_host.trim_end_matches('/'),
            ACCEL_SOL_PATH
        );
        Url::parse_with_params(
            &base,
            &[
                ("power_kw", inputs.power_kw.to_string()),
                ("mass_kg", mass_kg.to_string()),
                ("cda_m2", inputs.drag_area_m2.to_string()),
            ],
        )
        .map_err(|e| SimulationError::UrlError {
            url: base.clone(),
            reason: e.to_string(),
        })
    }

    pub async fn fetch(
        &self,
        inputs: &PerformanceInputs,
        mass_kg: f64,
    ) -> Result<AccelerationCurve, SimulationError> {
        let url = self.request_url(inputs, mass_kg)?;
        let fetch_error = |source: reqwest::Error| SimulationError::FetchError {
            url: url.to_string(),
            source,
        };

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        let body = response.text().await.map_err(fetch_error)?;

        let curve: AccelerationCurve =
            serde_json::from_str(&body).map_err(|source| SimulationError::DecodeError {
                url: url.to_string(),
                source,
            })?;
        curve.validate()?;

        debug!(%url, samples = curve.len(), "acceleration curve fetched");
        Ok(curve)
    }

    /// Fetches a curve, logging any failure together with the attempted URL.
    pub async fn fetch_logged(
        &self,
        inputs: &PerformanceInputs,
        mass_kg: f64,
    ) -> Option<AccelerationCurve> {
        match self.fetch(inputs, mass_kg).await {
            Ok(curve) => Some(curve),
            Err(e) => {
                let url = match e.url() {
                    Some(url) => url.to_string(),
                    None => self
                        .request_url(inputs, mass_kg)
                        .map(|url| url.to_string())
                        .unwrap_or_default(),
                };
                error!(%url, error = %e, "failed to fetch acceleration curve");
                None
            }
        }
    }
}
