//! HTTP service: multipart upload in, bionic HTML document out.
//!
//! | Method | Path         | Body / response |
//! |--------|--------------|-----------------|
//! | POST   | `/api/parse` | multipart field `file` (+ optional `bionic_enabled`) → `{success: true, ...document}` |
//! | GET    | `/health`    | `{"status":"ok"}` |
//!
//! Errors are `{success: false, error}` with 400 for client mistakes
//! (missing file, unsupported format, too large, undecodable text), 422
//! when a converter cannot read the document and 500 otherwise.
//!
//! `bionic_enabled` may also be given as a query parameter; the multipart
//! field wins when both are present. CORS is fully permissive.

use crate::config::ProcessingConfig;
use crate::error::ReaderError;
use crate::output::Document;
use crate::process::process;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Allowance on top of `max_file_size` for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    config: Arc<ProcessingConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ParseParams {
    bionic_enabled: Option<bool>,
}

#[derive(Serialize)]
struct ParseResponse {
    success: bool,
    #[serde(flatten)]
    document: Document,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Build the service router.
pub fn router(config: ProcessingConfig) -> Router {
    let body_limit = config.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route("/api/parse", post(parse_document))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, config: ProcessingConfig) -> Result<(), ReaderError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ReaderError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    info!(addr = %addr, "bionic-reader service listening");
    axum::serve(listener, router(config))
        .await
        .map_err(|e| ReaderError::Internal(format!("Server error: {}", e)))
}

/// HTTP status for a processing error.
pub fn status_for(error: &ReaderError) -> StatusCode {
    match error {
        ReaderError::ConversionFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn parse_document(
    State(state): State<AppState>,
    Query(params): Query<ParseParams>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut bionic_enabled = params.bionic_enabled;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Rejected multipart body: {}", e.body_text());
                return error_response(StatusCode::BAD_REQUEST, e.body_text());
            }
        };
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        warn!("Failed to read upload bytes: {}", e.body_text());
                        return error_response(StatusCode::BAD_REQUEST, e.body_text());
                    }
                }
            }
            "bionic_enabled" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("Failed to read bionic_enabled field: {}", e.body_text());
                        return error_response(StatusCode::BAD_REQUEST, e.body_text());
                    }
                };
                match parse_flag(&value) {
                    Some(flag) => bionic_enabled = Some(flag),
                    None => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Invalid bionic_enabled value '{}'", value),
                        )
                    }
                }
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided");
    };

    let mut config = (*state.config).clone();
    if let Some(flag) = bionic_enabled {
        config.bionic_enabled = flag;
    }

    match process(bytes, &filename, &config).await {
        Ok(document) => (
            StatusCode::OK,
            Json(ParseResponse {
                success: true,
                document,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(filename = %filename, "Processing failed: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
