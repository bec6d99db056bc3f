//! Session auth boundary for the admin console.
//!
//! Admin-only routes resolve a bearer token through [`AuthService`]; the
//! service also exposes a subscribe/unsubscribe lifecycle so a consumer can
//! observe sign-in and sign-out events and tear the registration down when it
//! goes away.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::info;
use uuid::Uuid;

/// Credentials the auth boundary validates sign-in attempts against.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl From<crate::config::AdminConfig> for AdminCredentials {
    fn from(value: crate::config::AdminConfig) -> Self {
        Self {
            email: value.email,
            password: value.password,
        }
    }
}

/// An authenticated admin session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Auth state transitions delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { email: String },
    SignedOut { email: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredentials,
}

type Listener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Process-wide session state with an explicit subscribe/unsubscribe
/// lifecycle, owned by the auth boundary.
pub struct AuthService {
    credentials: AdminCredentials,
    sessions: Mutex<HashMap<String, Session>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl AuthService {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self {
            credentials,
            sessions: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Validate credentials and open a session.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let matches = email.trim().eq_ignore_ascii_case(&self.credentials.email)
            && password == self.credentials.password;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            email: self.credentials.email.clone(),
            signed_in_at: Utc::now(),
        };

        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(session.token.clone(), session.clone());
        }
        self.emit(SessionEvent::SignedIn {
            email: session.email.clone(),
        });
        Ok(session)
    }

    /// Resolve a bearer token to its session, if one is open.
    pub fn session(&self, token: &str) -> Option<Session> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(token).cloned())
    }

    /// Close the session for a token. Unknown tokens are a no-op.
    pub fn sign_out(&self, token: &str) {
        let removed = self
            .sessions
            .lock()
            .ok()
            .and_then(|mut sessions| sessions.remove(token));
        if let Some(session) = removed {
            self.emit(SessionEvent::SignedOut {
                email: session.email,
            });
        }
    }

    /// Register a listener for session events. Dropping the returned
    /// subscription unregisters it.
    pub fn subscribe<F>(self: &Arc<Self>, listener: F) -> SessionSubscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Box::new(listener)));
        }
        SessionSubscription {
            auth: Arc::downgrade(self),
            id,
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Ok(listeners) = self.listeners.lock() {
            for (_, listener) in listeners.iter() {
                listener(&event);
            }
        }
    }

    fn unsubscribe(&self, id: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(listener_id, _)| *listener_id != id);
        }
    }
}

/// Handle tying a listener registration to its consumer's lifetime.
pub struct SessionSubscription {
    auth: Weak<AuthService>,
    id: u64,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(auth) = self.auth.upgrade() {
            auth.unsubscribe(self.id);
        }
    }
}

/// Extractor gating admin-only handlers on an open session.
pub struct AdminSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| unauthorized("admin session required"))?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token.and_then(|token| auth.session(token)) {
            Some(session) => Ok(AdminSession(session)),
            None => Err(unauthorized("admin session required")),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Router exposing sign-in and sign-out.
pub fn auth_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/logout", post(logout_handler))
        .with_state(service)
}

async fn login_handler(
    axum::extract::State(service): axum::extract::State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match service.sign_in(&request.email, &request.password) {
        Ok(session) => {
            info!(email = %session.email, "admin signed in");
            (StatusCode::OK, Json(session)).into_response()
        }
        Err(err) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn logout_handler(
    axum::extract::State(service): axum::extract::State<Arc<AuthService>>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        service.sign_out(token);
    }
    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}
