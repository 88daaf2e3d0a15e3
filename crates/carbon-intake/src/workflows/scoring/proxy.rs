use std::time::Instant;

use axum::http::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::ScoringConfig;

/// Status and JSON body handed back to the caller of the proxy endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: StatusCode,
    pub body: Value,
}

impl ProxyReply {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// `{ok: false, error}` at 500, used for anything that is not an upstream answer.
    pub fn internal_failure(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "ok": false, "error": message.into() }),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// Same-origin relay to the external scoring service. Stateless apart from the pooled client.
#[derive(Debug, Clone)]
pub struct AnalysisProxy {
    client: reqwest::Client,
    upstream_url: String,
}

impl AnalysisProxy {
    pub fn new(config: &ScoringConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ScoringConfig) -> Self {
        Self {
            client,
            upstream_url: config.api_url.clone(),
        }
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Forward `body` verbatim and translate the outcome into the endpoint's reply.
    pub async fn relay(&self, body: &Value) -> ProxyReply {
        let started = Instant::now();
        match self.forward(body).await {
            Ok(reply) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if reply.status.is_success() {
                    info!(status = reply.status.as_u16(), elapsed_ms, "scoring service answered");
                } else {
                    warn!(
                        status = reply.status.as_u16(),
                        elapsed_ms, "scoring service rejected analysis request"
                    );
                }
                reply
            }
            Err(err) => {
                error!(error = %err, upstream = %self.upstream_url, "scoring relay failed");
                ProxyReply::internal_failure(err.to_string())
            }
        }
    }

    async fn forward(&self, body: &Value) -> Result<ProxyReply, ProxyError> {
        debug!(upstream = %self.upstream_url, "relaying analysis request");

        let response = self
            .client
            .post(&self.upstream_url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let upstream_status = response.status().as_u16();
        if !response.status().is_success() {
            let details = response.text().await?;
            let status =
                StatusCode::from_u16(upstream_status).unwrap_or(StatusCode::BAD_GATEWAY);
            return Ok(ProxyReply::new(
                status,
                json!({
                    "ok": false,
                    "error": format!("Erro na API: {upstream_status}"),
                    "details": details,
                }),
            ));
        }

        let data: Value = response.json().await?;
        Ok(ProxyReply::new(StatusCode::OK, data))
    }
}
