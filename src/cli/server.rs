//! HTTP server mode for REST access to the aggregated contacts

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::service::{ContactService, PageRequest};
use crate::types::ContactSource;

/// Name reported by the health endpoint
pub const APPLICATION_NAME: &str = "contact-aggregator";

/// App state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    service: ContactService,
    upstream_url: String,
}

impl AppState {
    /// Create state over a contact service
    pub fn new(service: ContactService, upstream_url: impl Into<String>) -> Self {
        Self {
            service,
            upstream_url: upstream_url.into(),
        }
    }
}

/// Query parameters accepted by `GET /contacts`
///
/// Kept as raw strings so malformed values produce a structured 400.
#[derive(Debug, Default, Deserialize)]
struct ContactQuery {
    page: Option<String>,
    size: Option<String>,
    source: Option<String>,
}

impl ContactQuery {
    fn has_pagination(&self) -> bool {
        self.page.is_some() || self.size.is_some()
    }

    fn source(&self) -> Result<Option<ContactSource>> {
        self.source
            .as_deref()
            .map(|value| {
                value
                    .parse::<ContactSource>()
                    .map_err(|expected: String| Error::invalid_type("source", value, expected))
            })
            .transpose()
    }

    fn page_request(&self) -> Result<PageRequest> {
        PageRequest::from_optional(
            parse_integer("page", self.page.as_deref())?,
            parse_integer("size", self.size.as_deref())?,
        )
    }
}

fn parse_integer(parameter: &str, value: Option<&str>) -> Result<Option<i64>> {
    value
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid_type(parameter, v, "Expected type: Integer"))
        })
        .transpose()
}

/// Error wrapper rendering the structured error body
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status and caller-facing message for the wrapped error
    fn classify(&self) -> (StatusCode, &'static str) {
        match self.0.root() {
            Error::UpstreamUnavailable { .. } | Error::MalformedCursor { .. } => (
                StatusCode::BAD_GATEWAY,
                "Failed to retrieve data from external service",
            ),
            Error::DeadlineExceeded { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                "Failed to retrieve data from external service",
            ),
            Error::InvalidArgument { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid request parameters")
            }
            Error::InvalidParameterType { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid parameter type")
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        let details = self.0.to_string();

        if status.is_client_error() {
            warn!("Validation error: {}", details);
        } else {
            error!("Request failed: {}", error_chain(&self.0));
        }

        let body = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or_default(),
            "message": message,
            "details": details,
        });
        (status, Json(body)).into_response()
    }
}

/// Full cause chain of an error, for server-side logs only
fn error_chain(err: &Error) -> String {
    let mut chain = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/health/upstream", get(upstream_health))
        .route("/contacts", get(list_contacts))
        .route("/contacts/cache", delete(evict_cache))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| Error::invalid_config("server.host", format!("{e}")))?;
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
        "application": APPLICATION_NAME,
    }))
}

/// Probe the first upstream page, bypassing the cache
async fn upstream_health(State(state): State<Arc<AppState>>) -> Response {
    match state.service.check_upstream().await {
        Ok(_) => Json(json!({
            "status": "UP",
            "timestamp": Utc::now().to_rfc3339(),
            "externalApi": state.upstream_url,
            "detail": "reachable",
        }))
        .into_response(),
        Err(e) => {
            warn!("Upstream health check failed: {}", error_chain(&e));
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "DOWN",
                    "timestamp": Utc::now().to_rfc3339(),
                    "externalApi": state.upstream_url,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// List contacts, flat or paged
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ContactQuery>, QueryRejection>,
) -> std::result::Result<Response, ApiError> {
    let Query(params) =
        query.map_err(|rejection| Error::invalid_argument("query", rejection.body_text()))?;
    let source = params.source()?;

    if params.has_pagination() {
        let request = params.page_request()?;
        info!(
            "Received request to fetch contacts - page: {}, size: {}, source: {:?}",
            request.page(),
            request.size(),
            source
        );

        let result = state.service.page(request, source).await?;
        info!(
            "Returning page {} with {} contacts out of {} total",
            result.page,
            result.content.len(),
            result.total_elements
        );

        let headers = [
            ("x-total-count", result.total_elements.to_string()),
            ("x-total-pages", result.total_pages.to_string()),
            ("x-current-page", result.page.to_string()),
        ];
        Ok((headers, Json(result)).into_response())
    } else {
        info!("Received request to fetch all contacts - source: {:?}", source);

        let contacts = state.service.list(source).await?;
        info!("Returning {} contacts", contacts.len());

        Ok(Json(contacts).into_response())
    }
}

/// Evict the cached aggregate
async fn evict_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.service.evict().await;
    StatusCode::NO_CONTENT
}
