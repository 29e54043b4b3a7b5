use std::panic::AssertUnwindSafe;

use futures_util::FutureExt as _;
use tracing::{debug, error};

use super::ApiContext;
use super::document;
use super::handlers;
use super::http::{HttpRequest, HttpResponse};
use crate::error::ApiError;

const METRIC_PREFIX: &str = "/v1/metrics/";

/// Full per-request chain: panic recovery wraps the error envelope around
/// the route handler, and the request logger records the final status on
/// the way out. Clients always receive a well-formed document, never a raw
/// fault.
pub(super) async fn handle(context: &ApiContext, request: &HttpRequest) -> HttpResponse {
    let response = match AssertUnwindSafe(respond(context, request)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            error!("Handler panicked for {} {}", request.method, request.path);
            document::error_document(&ApiError::HandlerPanic)
        }
    };
    debug!(status = response.status, "{} {}", request.method, request.path);
    response
}

/// Error-envelope layer: the single point converting handler failures into
/// the standard document. Successful handler output passes through
/// unchanged.
async fn respond(context: &ApiContext, request: &HttpRequest) -> HttpResponse {
    match route(context, request).await {
        Ok(response) => response,
        Err(error) => document::error_document(&error),
    }
}

async fn route(context: &ApiContext, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/ping") => Ok(HttpResponse {
            status: 204,
            content_type: document::CONTENT_TYPE,
            body: Vec::new(),
        }),
        ("GET", "/v1/info") => handlers::info::get(context),
        ("GET", "/v1/error") => Err(ApiError::Fixed),
        ("GET", "/v1/status") => handlers::status::get(context).await,
        ("PATCH", "/v1/status") => handlers::status::patch(context, &request.body).await,
        ("GET", "/v1/metrics") => handlers::metrics::list(context),
        ("GET", path) if path.starts_with(METRIC_PREFIX) => {
            match path.strip_prefix(METRIC_PREFIX) {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    handlers::metrics::detail(context, id)
                }
                Some(_) | None => Ok(not_found()),
            }
        }
        _ => Ok(not_found()),
    }
}

/// Catch-all 404. Deliberately plain JSON rather than the document envelope.
fn not_found() -> HttpResponse {
    HttpResponse {
        status: 404,
        content_type: "application/json",
        body: br#"{"error":"Not Found"}"#.to_vec(),
    }
}
