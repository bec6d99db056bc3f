use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDataStore};
use crate::routes::backoffice_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use freight_backoffice::auth::{AuthService, SessionEvent};
use freight_backoffice::config::AppConfig;
use freight_backoffice::error::AppError;
use freight_backoffice::notify::{EmailDispatcher, NotifyState};
use freight_backoffice::telemetry;
use freight_backoffice::workflows::dispatch::DispatchService;
use freight_backoffice::workflows::reviews::ReviewWorkflowService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryDataStore::default());
    let mailer = Arc::new(EmailDispatcher::new(config.email.clone())?);

    let auth = Arc::new(AuthService::new(config.admin.clone().into()));
    let _session_log = auth.subscribe(|event| match event {
        SessionEvent::SignedIn { email } => info!(%email, "admin session opened"),
        SessionEvent::SignedOut { email } => info!(%email, "admin session closed"),
    });

    let reviews = Arc::new(ReviewWorkflowService::new(store.clone()));
    let dispatch = Arc::new(DispatchService::new(
        store,
        mailer.clone(),
        config.review.public_base_url.clone(),
    ));
    let notify = NotifyState {
        mailer,
        require_auth: !config.email.disable_endpoint_auth,
    };

    let app = backoffice_routes(reviews, dispatch, auth, notify)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "freight back office ready");

    axum::serve(listener, app).await?;
    Ok(())
}
