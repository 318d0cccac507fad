//! HTTP API for the allocation simulator
//!
//! ## Routes
//!
//! - `POST /firstfit`, `/bestfit`, `/worstfit`: run one strategy
//! - `POST /compare`: run all strategies and pick the best by utilization
//! - `GET /`: frontend `index.html`, or a status document
//! - `GET /health`: status document
//! - `HEAD` is answered like `GET` on every `GET` route
//! - `GET /<asset>`: frontend assets
//!
//! Every response carries permissive CORS headers; `OPTIONS` answers
//! preflight requests on any path.

pub mod cors;
pub mod error;
pub mod handlers;
pub mod server;
pub mod static_files;

use crate::config::AppConfig;
use crate::core::allocator::Strategy;
use crate::core::validation::Limits;
use self::error::{ApiError, ApiResult};
use self::handlers::StatusResponse;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

pub use server::serve;

/// Read-only state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    limits: Limits,
    max_body_bytes: usize,
    frontend_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(limits: Limits, max_body_bytes: usize, frontend_dir: Option<PathBuf>) -> Self {
        AppState {
            limits,
            max_body_bytes,
            frontend_dir,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        AppState::new(
            config.workload_limits(),
            config.limits.max_body_bytes,
            config.server.frontend_dir.clone(),
        )
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn frontend_dir(&self) -> Option<&Path> {
        self.frontend_dir.as_deref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::from_config(&AppConfig::default())
    }
}

/// Serialize `value` as a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            let mut response = Response::new(Full::new(Bytes::from_static(
                b"{\"error\":\"Internal error: response serialization failed\"}",
            )));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
    }
}

/// Handle one request end to end
///
/// Never fails: errors are rendered as JSON error documents.
pub async fn handle<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = match route(req, state).await {
        Ok(response) => response,
        Err(e) => {
            warn!(method = %method, path = %path, "Request rejected: {}", e);
            e.into_response()
        }
    };
    cors::apply(response.headers_mut());

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "request handled"
    );

    response
}

fn is_known_route(path: &str) -> bool {
    matches!(path, "/" | "/health" | "/compare") || Strategy::from_route(path).is_some()
}

async fn route<B>(req: Request<B>, state: &AppState) -> ApiResult<Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => Ok(cors::preflight()),
        (&Method::GET | &Method::HEAD, "/") => static_files::index(state).await,
        (&Method::GET | &Method::HEAD, "/health") => {
            Ok(json_response(StatusCode::OK, &StatusResponse::ok()))
        }
        (&Method::POST, "/compare") => {
            let body = read_body(req.into_body(), state.max_body_bytes()).await?;
            let comparison = handlers::compare_body(&body, state.limits())?;
            Ok(json_response(StatusCode::OK, &comparison))
        }
        (&Method::POST, p) => match Strategy::from_route(p) {
            Some(strategy) => {
                let body = read_body(req.into_body(), state.max_body_bytes()).await?;
                let result = handlers::simulate(strategy, &body, state.limits())?;
                Ok(json_response(StatusCode::OK, &result))
            }
            None if is_known_route(p) => Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
                path: p.to_string(),
            }),
            None => Err(ApiError::NotFound(p.to_string())),
        },
        (&Method::GET | &Method::HEAD, p) if !is_known_route(p) => {
            static_files::asset(state, p).await
        }
        (_, p) if is_known_route(p) => Err(ApiError::MethodNotAllowed {
            method: method.to_string(),
            path: p.to_string(),
        }),
        (_, p) => Err(ApiError::NotFound(p.to_string())),
    }
}

/// Collect a request body, refusing anything over `limit` bytes
async fn read_body<B>(body: B, limit: usize) -> ApiResult<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::PayloadTooLarge(limit))
        }
        Err(e) => Err(ApiError::BadRequest(format!("failed to read body: {}", e))),
    }
}
