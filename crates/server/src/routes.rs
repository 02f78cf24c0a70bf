//! HTTP routes: the page, the scan endpoint and the favicon

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::page::IndexPage;
use pingsweep_common::{PingsweepError, ScanRequest, ScanResult};
use pingsweep_orchestrator::ScanCoordinator;
use pingsweep_target_resolver::TargetResolver;

/// Everything a request needs. Cloned per request; the heavy parts are shared.
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<ScanCoordinator>,
    resolver: TargetResolver,
    page: Arc<IndexPage>,
    default_subnet: Arc<str>,
    icon: Option<Arc<Path>>,
}

impl AppState {
    pub fn new(
        coordinator: ScanCoordinator,
        resolver: TargetResolver,
        page: IndexPage,
        default_subnet: String,
        icon: Option<PathBuf>,
    ) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            resolver,
            page: Arc::new(page),
            default_subnet: default_subnet.into(),
            icon: icon.map(Arc::from),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/scan", post(scan).fallback(method_not_allowed))
        .route("/favicon.ico", get(favicon))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let html = state.page.render(&state.default_subnet, state.icon.is_some())?;
    Ok(Html(html))
}

/// Sweep the posted subnet. The body is decoded as JSON whatever its content type.
async fn scan(State(state): State<AppState>, body: Bytes) -> Result<Json<Vec<ScanResult>>, ApiError> {
    let request = decode_request(&body)?;

    let hosts = state.resolver.resolve(&request.subnet)?;
    info!("Scan requested for {} ({} hosts)", request.subnet, hosts.len());

    let results = state.coordinator.scan(hosts).await;
    Ok(Json(results))
}

/// Reads the first JSON value of the body; anything after it is ignored.
fn decode_request(body: &[u8]) -> Result<ScanRequest, PingsweepError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<ScanRequest>()
        .next()
    {
        Some(Ok(request)) => Ok(request),
        Some(Err(e)) => Err(PingsweepError::MalformedRequest(e.to_string())),
        None => Err(PingsweepError::MalformedRequest("empty body".to_string())),
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError(PingsweepError::MethodNotAllowed)
}

async fn favicon(State(state): State<AppState>) -> Result<Response, ApiError> {
    let Some(path) = state.icon.as_deref() else {
        return Ok(not_found());
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, icon_content_type(path))], bytes).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(not_found()),
        Err(e) => Err(PingsweepError::Io(e).into()),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

fn icon_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("ico") => "image/x-icon",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
