use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BrokerUpdate, LoadUpdate, NewBroker, NewDeliveryLoad, NewLoad};
use super::service::{DispatchError, DispatchService};
use crate::auth::AdminSession;
use crate::notify::Mailer;
use crate::store::{BrokerId, DataStore, DeliveryLoadId, LoadId};

/// Router builder for the admin console. Every route requires an open admin
/// session.
pub fn dispatch_router<D, M>(service: Arc<DispatchService<D, M>>) -> Router
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<D, M>))
        .route(
            "/api/v1/brokers",
            get(list_brokers_handler::<D, M>).post(create_broker_handler::<D, M>),
        )
        .route(
            "/api/v1/brokers/:broker_id",
            patch(update_broker_handler::<D, M>).delete(delete_broker_handler::<D, M>),
        )
        .route(
            "/api/v1/loads",
            get(list_loads_handler::<D, M>).post(create_load_handler::<D, M>),
        )
        .route(
            "/api/v1/loads/:load_id",
            patch(update_load_handler::<D, M>).delete(delete_load_handler::<D, M>),
        )
        .route(
            "/api/v1/delivery-loads",
            get(list_delivery_loads_handler::<D, M>).post(create_delivery_load_handler::<D, M>),
        )
        .route(
            "/api/v1/delivery-loads/:delivery_load_id",
            delete(delete_delivery_load_handler::<D, M>),
        )
        .route(
            "/api/v1/delivery-loads/:delivery_load_id/completion",
            patch(toggle_delivery_handler::<D, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    /// The value the tracker currently displays; the toggle flips it.
    load_completed: bool,
}

async fn dashboard_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.dashboard() {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_brokers_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.list_brokers() {
        Ok(brokers) => (StatusCode::OK, Json(brokers)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_broker_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Json(broker): Json<NewBroker>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.create_broker(broker) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_broker_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(broker_id): Path<String>,
    Json(update): Json<BrokerUpdate>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.update_broker(&BrokerId(broker_id), update) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_broker_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(broker_id): Path<String>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.delete_broker(&BrokerId(broker_id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_loads_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.list_loads() {
        Ok(loads) => (StatusCode::OK, Json(loads)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_load_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Json(load): Json<NewLoad>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.create_load(load).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_load_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(load_id): Path<String>,
    Json(update): Json<LoadUpdate>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.update_load(&LoadId(load_id), update) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_load_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(load_id): Path<String>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.delete_load(&LoadId(load_id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_delivery_loads_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.delivery_loads() {
        Ok(loads) => (StatusCode::OK, Json(loads)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_delivery_load_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Json(load): Json<NewDeliveryLoad>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.create_delivery_load(load) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn toggle_delivery_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(delivery_load_id): Path<String>,
    Json(request): Json<CompletionRequest>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.toggle_delivery_completion(
        &DeliveryLoadId(delivery_load_id),
        request.load_completed,
    ) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_delivery_load_handler<D, M>(
    _session: AdminSession,
    State(service): State<Arc<DispatchService<D, M>>>,
    Path(delivery_load_id): Path<String>,
) -> Response
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    match service.delete_delivery_load(&DeliveryLoadId(delivery_load_id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DispatchError) -> Response {
    let status = match &err {
        DispatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DispatchError::BrokerNotFound
        | DispatchError::LoadNotFound
        | DispatchError::DeliveryLoadNotFound => StatusCode::NOT_FOUND,
        DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
