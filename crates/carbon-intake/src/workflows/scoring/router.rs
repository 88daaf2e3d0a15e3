use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;
use tracing::warn;

use super::proxy::{AnalysisProxy, ProxyReply};

/// Path of the same-origin relay endpoint.
pub const ANALYSIS_PROXY_PATH: &str = "/api/analise-fazenda";

/// Router exposing the scoring relay.
pub fn analysis_router(proxy: Arc<AnalysisProxy>) -> Router {
    Router::new()
        .route(ANALYSIS_PROXY_PATH, post(relay_handler))
        .with_state(proxy)
}

pub(crate) async fn relay_handler(State(proxy): State<Arc<AnalysisProxy>>, body: Bytes) -> Response {
    let reply = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => proxy.relay(&payload).await,
        Err(err) => {
            warn!(error = %err, "analysis request body is not valid JSON");
            ProxyReply::internal_failure(err.to_string())
        }
    };

    (reply.status, axum::Json(reply.body)).into_response()
}
