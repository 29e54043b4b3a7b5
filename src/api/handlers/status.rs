use crate::api::ApiContext;
use crate::api::document;
use crate::api::http::HttpResponse;
use crate::error::ApiError;

pub(in crate::api) async fn get(context: &ApiContext) -> Result<HttpResponse, ApiError> {
    let status = context.engine.status().await;
    document::resource("status", "default", &status, "status document")
}

/// Status mutation state machine. The whole check-parse-scale-commit
/// sequence runs under the engine's status lock; no await happens while the
/// guard is held, and concurrent PATCHes serialize on it.
pub(in crate::api) async fn patch(
    context: &ApiContext,
    body: &[u8],
) -> Result<HttpResponse, ApiError> {
    let mut current = context.engine.lock_status().await;

    if !current.running {
        return Err(ApiError::TestStopped);
    }

    let next = document::decode_status_patch(body)?.apply(*current);

    // Side effects precede the commit so a failed scale never leaves the
    // committed status ahead of the engine.
    if next.active_vus != current.active_vus {
        context.engine.scale(next.active_vus)?;
    }
    if !next.running {
        context.shutdown.fire();
    }

    *current = next;
    drop(current);

    document::resource("status", "default", &next, "status document")
}
