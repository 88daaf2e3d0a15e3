use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use super::proxy::{AnalysisProxy, ProxyReply};
use super::router::ANALYSIS_PROXY_PATH;
use crate::workflows::eligibility::FarmAnalysisRequest;

/// Seam between the intake controller and whatever answers the proxy endpoint.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn submit(&self, request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError>;
}

/// Failures that prevent a reply from being observed at all.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to reach analysis endpoint: {0}")]
    Connect(String),
    #[error("failed to encode analysis request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// In-process gateway: the site's own form handler calls the relay directly.
#[async_trait]
impl AnalysisGateway for AnalysisProxy {
    async fn submit(&self, request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError> {
        let payload = serde_json::to_value(request)?;
        Ok(self.relay(&payload).await)
    }
}

/// Gateway posting to a running site's proxy endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisGateway {
    /// `site_url` is the site's base URL, e.g. `http://127.0.0.1:3000`.
    pub fn new(site_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), site_url)
    }

    pub fn with_client(client: reqwest::Client, site_url: &str) -> Self {
        let endpoint = format!("{}{}", site_url.trim_end_matches('/'), ANALYSIS_PROXY_PATH);
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn submit(&self, request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError> {
        debug!(endpoint = %self.endpoint, "posting analysis request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| GatewayError::Connect(err.to_string()))?;

        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::Connect(err.to_string()))?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        Ok(ProxyReply::new(status, body))
    }
}
