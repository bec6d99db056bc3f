use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ReviewGate, ReviewSubmissionRequest};
use super::service::{ReviewSubmissionError, ReviewWorkflowError, ReviewWorkflowService};
use crate::auth::AdminSession;
use crate::store::{DataStore, ReviewId};

/// Router builder for the public review form, the admin review table, and
/// the public wall.
pub fn review_router<D>(service: Arc<ReviewWorkflowService<D>>) -> Router
where
    D: DataStore + 'static,
{
    Router::new()
        .route(
            "/submit-review",
            get(gate_handler::<D>).post(submit_handler::<D>),
        )
        .route("/api/v1/wall", get(wall_handler::<D>))
        .route("/api/v1/reviews", get(admin_reviews_handler::<D>))
        .route(
            "/api/v1/reviews/:review_id/visibility",
            patch(visibility_handler::<D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewLinkQuery {
    #[serde(default)]
    load_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisibilityRequest {
    /// The value the admin table currently displays; the toggle flips it.
    show_on_site: bool,
}

async fn gate_handler<D>(
    State(service): State<Arc<ReviewWorkflowService<D>>>,
    Query(query): Query<ReviewLinkQuery>,
) -> Response
where
    D: DataStore + 'static,
{
    let Some(load_uuid) = query.load_uuid else {
        return not_found_view();
    };

    match service.gate(&load_uuid) {
        ReviewGate::NotFound => not_found_view(),
        ReviewGate::AlreadyReviewed => {
            (StatusCode::OK, Json(json!({ "state": "already_reviewed" }))).into_response()
        }
        ReviewGate::Open(form) => {
            (StatusCode::OK, Json(json!({ "state": "open", "form": form }))).into_response()
        }
    }
}

async fn submit_handler<D>(
    State(service): State<Arc<ReviewWorkflowService<D>>>,
    Query(query): Query<ReviewLinkQuery>,
    Json(request): Json<ReviewSubmissionRequest>,
) -> Response
where
    D: DataStore + 'static,
{
    let Some(load_uuid) = query.load_uuid else {
        return not_found_view();
    };

    match service.submit(&load_uuid, request) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(json!({ "state": "submitted", "review": record })),
        )
            .into_response(),
        Err(ReviewSubmissionError::Validation(err)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(ReviewSubmissionError::LoadNotFound) => not_found_view(),
        Err(ReviewSubmissionError::AlreadyReviewed) => (
            StatusCode::CONFLICT,
            Json(json!({ "state": "already_reviewed" })),
        )
            .into_response(),
        Err(ReviewSubmissionError::Store(err)) => service_error(err.to_string()),
    }
}

async fn admin_reviews_handler<D>(
    _session: AdminSession,
    State(service): State<Arc<ReviewWorkflowService<D>>>,
) -> Response
where
    D: DataStore + 'static,
{
    match service.admin_reviews() {
        Ok(reviews) => (StatusCode::OK, Json(reviews)).into_response(),
        Err(err) => service_error(err.to_string()),
    }
}

async fn visibility_handler<D>(
    _session: AdminSession,
    State(service): State<Arc<ReviewWorkflowService<D>>>,
    Path(review_id): Path<String>,
    Json(request): Json<VisibilityRequest>,
) -> Response
where
    D: DataStore + 'static,
{
    let id = ReviewId(review_id);
    match service.toggle_visibility(&id, request.show_on_site) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(ReviewWorkflowError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "review not found" })),
        )
            .into_response(),
        Err(ReviewWorkflowError::Store(err)) => service_error(err.to_string()),
    }
}

async fn wall_handler<D>(State(service): State<Arc<ReviewWorkflowService<D>>>) -> Response
where
    D: DataStore + 'static,
{
    match service.public_wall() {
        Ok(reviews) => (StatusCode::OK, Json(reviews)).into_response(),
        Err(err) => service_error(err.to_string()),
    }
}

fn not_found_view() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "state": "not_found" }))).into_response()
}

fn service_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
