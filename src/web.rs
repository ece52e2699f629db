use crate::{
    app::{AppError, ItineraryPlanner},
    prompt::ItineraryRequest,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
pub struct SharedState {
    pub planner: Arc<ItineraryPlanner>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/generate_itinerary", post(generate_itinerary))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("failed to install SIGTERM handler: {err}");
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
    log::warn!("shutting down");
}

pub async fn serve(planner: ItineraryPlanner, addr: &str) -> anyhow::Result<()> {
    let state = SharedState {
        planner: Arc::new(planner),
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Starting RAG server on {addr}...");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        log::error!("{}", self.0);

        // provider detail stays in the log
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": INTERNAL_ERROR_MESSAGE})),
        )
            .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "RAG server running!".to_string(),
    })
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ItineraryResponse {
    pub itinerary: String,
}

async fn generate_itinerary(
    State(state): State<SharedState>,
    Json(payload): Json<ItineraryRequest>,
) -> Result<Json<ItineraryResponse>, HttpError> {
    log::debug!("payload: {payload:?}");

    let itinerary = state.planner.generate(&payload).await?;

    Ok(Json(ItineraryResponse { itinerary }))
}
