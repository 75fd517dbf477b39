//! Composition root for the service host binary.
//!
//! Loads the YAML config (path from the first CLI argument, default
//! `config.yaml`), initializes logging, builds the registry and applications
//! explicitly — no globals — and hands them to the supervisor.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use apphost::config::LogConfig;
use apphost::{
    dispatch, Config, ConfigError, EventApp, EventManagerRegistry, HttpApp, LogHandler, Payload,
    Supervisor,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("config file {config_path} not found; using defaults");
            Config::default()
        }
        Err(err) => {
            eprintln!("failed to load {config_path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log);
    info!(
        name = %config.application.name,
        version = %config.application.version,
        env = %config.application.env,
        "starting service host"
    );

    let registry = Arc::new(EventManagerRegistry::new());

    let bus = config.event_bus.first().cloned().unwrap_or_default();
    let event_app = Arc::new(EventApp::new(
        "gen_event_app",
        bus.alias,
        bus.queue_capacity,
        vec![
            Arc::new(LogHandler::new("sample_a")),
            Arc::new(LogHandler::new("sample_b")),
        ],
        Arc::clone(&registry),
    ));

    let http = config
        .http_server("data_collection_api")
        .cloned()
        .unwrap_or_default();
    let http_app = Arc::new(
        HttpApp::new(http.name.clone(), http.addr.clone(), router(Arc::clone(&registry)))
            .with_close_timeout(http.close_timeout()),
    );

    let supervisor = Supervisor::new(vec![event_app, http_app]);
    match supervisor.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, label = err.as_label(), "service host terminated");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cfg: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn router(registry: Arc<EventManagerRegistry>) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/v1/report", post(report))
        .with_state(registry)
}

#[derive(Serialize)]
struct ApiResponse {
    code: u8,
    msg: &'static str,
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        code: 0,
        msg: "it's ok",
    })
}

/// Producer endpoint: parse the report payload and publish it through the
/// registry. Dispatch is fire-and-forget — the response only reflects parse
/// and lookup failures.
async fn report(
    State(registry): State<Arc<EventManagerRegistry>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse>) {
    let payload: Payload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "unmarshal body failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse {
                    code: 2,
                    msg: "unmarshal body failed",
                }),
            );
        }
    };
    if let Err(err) = dispatch(&registry, payload).await {
        error!(error = %err, "dispatch failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse {
                code: 3,
                msg: "dispatch failed",
            }),
        );
    }
    (StatusCode::OK, Json(ApiResponse { code: 0, msg: "ok" }))
}
