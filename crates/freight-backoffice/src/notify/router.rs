use super::{review_invitation, Mailer};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// State for the standalone send endpoint.
pub struct NotifyState<M> {
    pub mailer: Arc<M>,
    pub require_auth: bool,
}

impl<M> Clone for NotifyState<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: self.mailer.clone(),
            require_auth: self.require_auth,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest {
    #[serde(default)]
    broker_email: Option<String>,
    #[serde(default)]
    load_id_name: Option<String>,
    #[serde(default)]
    load_link: Option<String>,
}

/// Router for the broker-invitation send endpoint. Callers present a bearer
/// Authorization header unless the auth check is disabled by configuration.
pub fn notify_router<M>(state: NotifyState<M>) -> Router
where
    M: Mailer + 'static,
{
    Router::new()
        .route("/send-email", post(send_email_handler::<M>))
        .with_state(state)
}

async fn send_email_handler<M>(
    axum::extract::State(state): axum::extract::State<NotifyState<M>>,
    headers: HeaderMap,
    Json(request): Json<SendEmailRequest>,
) -> Response
where
    M: Mailer + 'static,
{
    if state.require_auth {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("Bearer "))
            .unwrap_or(false);
        if !bearer {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing or invalid Authorization header" })),
            )
                .into_response();
        }
    }

    let (to, link) = match (request.broker_email, request.load_link) {
        (Some(to), Some(link)) if !to.trim().is_empty() && !link.trim().is_empty() => (to, link),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "brokerEmail and loadLink are required" })),
            )
                .into_response();
        }
    };

    let message = review_invitation(&to, &link, request.load_id_name.as_deref());
    match state.mailer.send(&message).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}
