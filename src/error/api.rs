use thiserror::Error;

use super::EngineError;

/// Failures surfaced to API clients through the error envelope. The
/// `Display` output becomes the `title` of the envelope entry.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A stopped run accepts no further mutation.
    #[error("Test is stopped")]
    TestStopped,
    #[error("Malformed status document: {source}")]
    BadRequest {
        #[source]
        source: serde_json::Error,
    },
    #[error("Metric not found")]
    MetricNotFound,
    #[error("Serialization error during {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// Fixed test error served by `GET /v1/error`.
    #[error("This is an error")]
    Fixed,
    /// An unrecovered fault in a handler, converted by the recovery layer.
    #[error("Internal server error")]
    HandlerPanic,
    #[error("{reason}")]
    MalformedRequest { reason: &'static str },
    #[error("Request too large")]
    RequestTooLarge,
    #[error("Failed to read request: {source}")]
    RequestRead {
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// HTTP status code rendered alongside the error envelope.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::TestStopped
            | Self::BadRequest { .. }
            | Self::MalformedRequest { .. }
            | Self::RequestRead { .. } => 400,
            Self::MetricNotFound => 404,
            Self::RequestTooLarge => 413,
            Self::Serialize { .. } | Self::Engine(_) | Self::Fixed | Self::HandlerPanic => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::TestStopped.status(), 400);
        assert_eq!(ApiError::MetricNotFound.status(), 404);
        assert_eq!(ApiError::RequestTooLarge.status(), 413);
        assert_eq!(ApiError::Fixed.status(), 500);
        assert_eq!(ApiError::HandlerPanic.status(), 500);
        let engine = EngineError::ScaleFailed {
            active_vus: 3,
            reason: "offline".to_owned(),
        };
        assert_eq!(ApiError::Engine(engine).status(), 500);
    }

    #[test]
    fn titles_are_stable() {
        assert_eq!(ApiError::TestStopped.to_string(), "Test is stopped");
        assert_eq!(ApiError::MetricNotFound.to_string(), "Metric not found");
        assert_eq!(ApiError::Fixed.to_string(), "This is an error");
    }
}
