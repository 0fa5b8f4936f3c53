use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding the service origin
pub const API_URL_ENV: &str = "PBIT_API_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from the /api/health endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Reads the origin from `PBIT_API_URL`, falling back to the local service
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(raw) => match Url::parse(&raw) {
                Ok(base_url) => Self { base_url },
                Err(e) => {
                    tracing::warn!("Ignoring invalid {}={:?}: {}", API_URL_ENV, raw, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}
