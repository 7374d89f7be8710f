use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Request to {url} failed: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} could not be decoded: {source}")]
    DecodeError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed curve: {time_len} time samples but {velocity_len} velocity samples")]
    MalformedCurve { time_len: usize, velocity_len: usize },

    #[error("Invalid URL {url}: {reason}")]
    UrlError { url: String, reason: String },

    #[error("Chart error: {0}")]
    ChartError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SimulationError {
    /// The URL of the request that produced this error, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            SimulationError::FetchError { url, .. }
            | SimulationError::DecodeError { url, .. }
            | SimulationError::UrlError { url, .. } => Some(url),
            _ => None,
        }
    }
}
