//! # Application Bootstrapping and Logic
//!
//! Builds the [`AppContext`] from configuration, assembles the HTTP router
//! with its middleware stack, and serves it.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::HeaderName, Request},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    app::AppContext,
    clinic::{seed, ClinicServices},
    config::{self, Config},
    controller::{AppRoutes, ListRoutes},
    environment::Environment,
    Error, Result,
};

const X_REQUEST_ID: &str = "x-request-id";

/// Creates the application context: services over the configured store,
/// seeded with the bundled fixture when `seed` is set.
///
/// # Errors
/// Fails when the database cannot be reached or seeding fails.
pub async fn create_context(environment: &Environment, config: Config) -> Result<AppContext> {
    let store = config.store.clone();
    let ctx = match store {
        config::Store::Memory => {
            AppContext::new(environment.clone(), config, ClinicServices::in_memory())
        }
        #[cfg(feature = "with-db")]
        config::Store::Database(database) => {
            let db = crate::models::connect(&database).await?;
            let services = ClinicServices::from_database(&db);
            let mut ctx = AppContext::new(environment.clone(), config, services);
            ctx.db = Some(db);
            ctx
        }
    };

    if ctx.config.seed {
        seed::run(&ctx.services()).await?;
    }
    Ok(ctx)
}

/// Lists the routes the configuration mounts.
#[must_use]
pub fn list_routes(config: &Config) -> Vec<ListRoutes> {
    AppRoutes::from_config(config).collect()
}

/// Builds the router of every enabled service with request tracing,
/// request ids, a request timeout and panic recovery.
pub fn create_router(ctx: AppContext) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);
    let timeout = Duration::from_secs(ctx.config.server.timeout_secs);

    AppRoutes::from_config(&ctx.config)
        .to_router()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        tracing::info_span!(
                            "http-request",
                            "http.method" = %request.method(),
                            "http.uri" = %request.uri(),
                            "http.version" = ?request.version(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TimeoutLayer::new(timeout))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(ctx)
}

#[allow(clippy::needless_pass_by_value)]
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(err.msg = message, "server_panic");
    Error::Message(message.to_string()).into_response()
}

/// Serves the application until `ctrl-c` or `SIGTERM`.
///
/// # Errors
/// Fails when the address cannot be bound or the server stops with an error.
pub async fn start(ctx: AppContext, binding: &str, port: i32) -> Result<()> {
    let router = create_router(ctx);
    let listener = tokio::net::TcpListener::bind(format!("{binding}:{port}")).await?;
    tracing::info!(binding, port, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(err.msg = %err, "ctrl_c_handler_failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(err.msg = %err, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting_down");
}
