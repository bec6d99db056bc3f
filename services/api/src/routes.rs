use crate::infra::{AppState, InMemoryDataStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;

use freight_backoffice::auth::{auth_router, AuthService};
use freight_backoffice::notify::{notify_router, EmailDispatcher, NotifyState};
use freight_backoffice::workflows::dispatch::{dispatch_router, DispatchService};
use freight_backoffice::workflows::reviews::{review_router, ReviewWorkflowService};

/// Merge every workflow router with the operational endpoints. Admin-only
/// handlers resolve their session through the auth service extension.
pub(crate) fn backoffice_routes(
    reviews: Arc<ReviewWorkflowService<InMemoryDataStore>>,
    dispatch: Arc<DispatchService<InMemoryDataStore, EmailDispatcher>>,
    auth: Arc<AuthService>,
    notify: NotifyState<EmailDispatcher>,
) -> Router {
    Router::new()
        .merge(review_router(reviews))
        .merge(dispatch_router(dispatch))
        .merge(auth_router(auth.clone()))
        .merge(notify_router(notify))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(auth))
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
