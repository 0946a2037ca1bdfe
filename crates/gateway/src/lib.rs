//! HTTP API gateway for mockrag.
//!
//! Exposes the production retrieval service's contract:
//!
//! - `GET  /`                static service information
//! - `GET  /health`          liveness check
//! - `POST /rag`             answer a query as a single-event SSE stream
//! - `POST /submit_feedback` acknowledge feedback (nothing is stored)
//!
//! Built on Axum.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::sse::{Event as SseEvent, Sse},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use mockrag_config::{AppConfig, GatewayConfig, ServiceInfoConfig};
use mockrag_core::{FeedbackAck, FeedbackRequest};
use mockrag_engine::MockService;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: Arc<MockService>,
    pub info: ServiceInfoConfig,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/rag", post(rag_handler))
        .route("/submit_feedback", post(feedback_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the router with CORS and the request body limit applied.
pub fn build_full_router(state: SharedState, config: &GatewayConfig) -> Router {
    build_router(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_origins))
}

/// `["*"]` allows everything; otherwise only the listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// The template store is loaded once here, before the listener binds.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let service = Arc::new(MockService::from_config(&config));
    if service.template_count() == 0 {
        warn!(
            dir = %config.templates.dir.display(),
            "Serving with an empty template store, every /rag request will fail"
        );
    }

    let state = Arc::new(GatewayState {
        service,
        info: config.service.clone(),
    });
    let app = build_full_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// A pipeline error rendered as a JSON error body.
struct ApiError(mockrag_core::Error);

impl From<mockrag_core::Error> for ApiError {
    fn from(e: mockrag_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            mockrag_core::Error::Feedback(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: String,
    version: String,
    note: String,
}

async fn root_handler(State(state): State<SharedState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.info.message.clone(),
        version: state.info.version.clone(),
        note: state.info.note.clone(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    mode: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        mode: "mock",
    })
}

#[derive(Deserialize)]
struct RagRequest {
    query: String,
}

/// `POST /rag`. Every failure is resolved before the stream opens, so a
/// client sees either an error status or a complete event.
async fn rag_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RagRequest>,
) -> Result<Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    info!(query_len = payload.query.len(), "/rag request");

    let events = state.service.stream(&payload.query)?;
    let stream = tokio_stream::iter(
        events
            .into_iter()
            .map(|event| Ok::<_, Infallible>(SseEvent::default().data(event.data))),
    );

    Ok(Sse::new(stream))
}

async fn feedback_handler(
    State(state): State<SharedState>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<FeedbackAck>, ApiError> {
    let ack = state.service.acknowledge(&payload.trace_id)?;
    Ok(Json(ack))
}
