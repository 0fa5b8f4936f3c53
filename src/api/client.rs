use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, ErrorResponse, HealthResponse};
use crate::domain::AppError;

const PROCESS_FILE_PATH: &str = "/api/process-file";
const HEALTH_PATH: &str = "/api/health";
const FILE_FIELD: &str = "file";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ServiceError { status, message } => AppError::Service { status, message },
            ApiError::RequestError(e) => AppError::Transport(e.to_string()),
            other => AppError::Transport(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Uploads one file as the multipart field `file` and returns the
    /// processed artifact as raw bytes.
    pub async fn process_file(&self, file_name: &str, content: Bytes) -> Result<Bytes> {
        let url = self.endpoint(PROCESS_FILE_PATH)?;

        let part = Part::bytes(content.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!("POST {} ({} bytes)", url, content.len());
        let response = self.http.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(ApiError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint(HEALTH_PATH)?;

        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::InvalidResponse(format!("Health check failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig::new(Url::parse(&server.url()).unwrap()))
    }

    #[tokio::test]
    async fn test_process_file_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/process-file")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(
                r#"name="file"; filename="report.pbit""#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.4 fake")
            .create_async()
            .await;

        let client = client_for(&server);
        let body = client
            .process_file("report.pbit", Bytes::from(vec![b'a'; 64]))
            .await
            .unwrap();

        assert_eq!(&body[..], b"%PDF-1.4 fake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_file_uses_json_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/process-file")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"bad format"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .process_file("report.pbit", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        match err {
            ApiError::ServiceError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "bad format");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_process_file_falls_back_to_status_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/process-file")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .process_file("report.pbit", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert_eq!(
            AppError::from(err),
            AppError::Service {
                status: 502,
                message: "HTTP error! status: 502".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_process_file_transport_failure() {
        // Nothing listens on port 1
        let client = ApiClient::new(ApiConfig::new(Url::parse("http://127.0.0.1:1").unwrap()));
        let err = client
            .process_file("report.pbit", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::RequestError(_)));
        assert!(matches!(AppError::from(err), AppError::Transport(_)));
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"healthy","service":"Power BI Documentador API","timestamp":"2026-01-01T00:00:00"}"#,
            )
            .create_async()
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "Power BI Documentador API");
    }
}
