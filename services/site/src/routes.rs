use crate::infra::{session_cookie, session_id, AppState, SiteState};
use crate::pages::{intake_page, landing_page, FORM_PATH};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Json, Router};
use carbon_intake::error::AppError;
use carbon_intake::workflows::eligibility::{
    FarmIntakeForm, InMemorySessionStore, IntakeController, SubmitOutcome, RESULTS_PATH,
};
use carbon_intake::workflows::results::{results_page, ResultsView};
use carbon_intake::workflows::scoring::analysis_router;
use serde_json::json;
use tracing::info;

/// Pages, the scoring relay, and the operational endpoints.
pub(crate) fn site_router(state: SiteState) -> Router {
    let proxy = state.proxy.clone();

    Router::new()
        .route("/", get(landing_endpoint))
        .route(FORM_PATH, get(intake_form_endpoint).post(intake_submit_endpoint))
        .route(RESULTS_PATH, get(results_endpoint))
        .with_state(state)
        .merge(analysis_router(proxy))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn landing_endpoint() -> Html<String> {
    Html(landing_page())
}

pub(crate) async fn intake_form_endpoint() -> Html<String> {
    Html(intake_page(&IntakeController::new()))
}

pub(crate) async fn intake_submit_endpoint(
    State(state): State<SiteState>,
    headers: HeaderMap,
    Form(form): Form<FarmIntakeForm>,
) -> Result<Response, AppError> {
    let known = session_id(&headers);
    let mut controller = IntakeController::from_form(&form);

    // Cookieless visitors have no session yet, so their submissions are not deduplicated.
    let _submission = match known {
        Some(id) => match state.sessions.begin_submission(id)? {
            Some(guard) => Some(guard),
            None => {
                controller.reject_duplicate();
                return Ok((StatusCode::CONFLICT, Html(intake_page(&controller))).into_response());
            }
        },
        None => None,
    };

    let accepted = InMemorySessionStore::new();
    match controller.submit(state.proxy.as_ref(), &accepted).await {
        SubmitOutcome::Navigate(path) => {
            let session = state.sessions.adopt(known, &accepted)?;
            info!(%session, "intake accepted, redirecting to results");
            let cookie = [(header::SET_COOKIE, session_cookie(session))];
            Ok((cookie, Redirect::to(path)).into_response())
        }
        SubmitOutcome::Rejected(_) => {
            let status = if controller.errors().is_empty() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            Ok((status, Html(intake_page(&controller))).into_response())
        }
    }
}

pub(crate) async fn results_endpoint(
    State(state): State<SiteState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let view = match state.sessions.existing(session_id(&headers))? {
        Some(store) => ResultsView::load(&store),
        None => ResultsView::Unavailable,
    };
    Ok(Html(results_page(&view)))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
