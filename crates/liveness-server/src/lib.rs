//! HTTP gateway for face-liveness sessions.
//!
//! Guarded routes require operator credentials, either as HTTP Basic or as the
//! `username`/`password` cookies issued by `POST /login`:
//!
//! | Route | Guarded |
//! |-------|---------|
//! | `GET /` | yes |
//! | `GET /create_liveness_session` | yes |
//! | `GET /get_liveness_result/{session_id}` | yes |
//! | `GET /details/{session_id}` | yes |
//! | `GET /image/{session_id}` | no |
//! | `GET /login`, `POST /login` | no |
//!
//! A session's result is fetched from the remote service until it reports
//! `SUCCEEDED`; after that the captured record is served from disk only.

use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use liveness_core::{HttpVerificationClient, SessionStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use auth::require_operator;
use config::GatewayConfig;
use routes::{
    create_session_handler, details_handler, image_handler, index_handler, login_form_handler,
    login_handler, result_handler,
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let guarded = Router::new()
        .route("/", get(index_handler))
        .route("/create_liveness_session", get(create_session_handler))
        .route("/get_liveness_result/{session_id}", get(result_handler))
        .route("/details/{session_id}", get(details_handler))
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_operator,
        ));

    let public = Router::new()
        .route("/image/{session_id}", get(image_handler))
        .route("/login", get(login_form_handler).post(login_handler));

    guarded
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

pub async fn start_server(config: GatewayConfig) -> anyhow::Result<()> {
    info!("Initializing state...");
    let store = SessionStore::with_dir(&config.files_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("failed to create {}", config.files_dir.display()))?;

    let client = HttpVerificationClient::new(config.remote.clone())
        .context("failed to build verification client")?;
    info!(
        endpoint = %client.endpoint(),
        files_dir = %config.files_dir.display(),
        "remote service configured"
    );

    let state = AppState::new(Arc::new(client), store, config.operator.clone())
        .context("failed to load templates")?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Server running on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
