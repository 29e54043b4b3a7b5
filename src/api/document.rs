use serde::{Deserialize, Serialize};

use super::http::HttpResponse;
use crate::engine::Status;
use crate::error::ApiError;

/// Media type stamped on every response the envelope layer produces, success
/// or failure. The sole exception is the catch-all 404 in the router.
pub const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Last-resort error body used if the error envelope itself fails to encode.
const FALLBACK_ERROR_BODY: &[u8] = br#"{"errors":[{"title":"Internal server error"}]}"#;

#[derive(Debug, Serialize, Deserialize)]
pub struct Resource<T> {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    pub attributes: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceDocument<T> {
    pub data: Resource<T>,
}

#[derive(Debug, Serialize)]
pub struct CollectionDocument<T> {
    pub data: Vec<Resource<T>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorEntry>,
}

/// Fields of a Status PATCH document. Absent attributes keep their current
/// values, so the decoded result is a working copy of the current status.
#[derive(Debug, Default, Deserialize)]
pub struct StatusPatch {
    pub running: Option<bool>,
    pub active_vus: Option<u64>,
}

impl StatusPatch {
    #[must_use]
    pub fn apply(&self, current: Status) -> Status {
        Status {
            running: self.running.unwrap_or(current.running),
            active_vus: self.active_vus.unwrap_or(current.active_vus),
        }
    }
}

pub(super) fn encode<T: Serialize>(
    status: u16,
    document: &T,
    context: &'static str,
) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_vec(document).map_err(|source| ApiError::Serialize { context, source })?;
    Ok(HttpResponse {
        status,
        content_type: CONTENT_TYPE,
        body,
    })
}

/// Single-resource success document, status 200.
pub(super) fn resource<T: Serialize>(
    kind: &str,
    id: &str,
    attributes: &T,
    context: &'static str,
) -> Result<HttpResponse, ApiError> {
    let document = ResourceDocument {
        data: Resource {
            kind: kind.to_owned(),
            id: id.to_owned(),
            attributes,
        },
    };
    encode(200, &document, context)
}

/// Renders an error list as the standard envelope with the error's status
/// code. This is the single rendering point for every handler failure.
pub(super) fn error_document(error: &ApiError) -> HttpResponse {
    let document = ErrorDocument {
        errors: vec![ErrorEntry {
            title: error.to_string(),
        }],
    };
    let body = serde_json::to_vec(&document).unwrap_or_else(|_| FALLBACK_ERROR_BODY.to_vec());
    HttpResponse {
        status: error.status(),
        content_type: CONTENT_TYPE,
        body,
    }
}

pub(super) fn decode_status_patch(body: &[u8]) -> Result<StatusPatch, ApiError> {
    let document: ResourceDocument<StatusPatch> =
        serde_json::from_slice(body).map_err(|source| ApiError::BadRequest { source })?;
    Ok(document.data.attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_document_shape() -> Result<(), String> {
        let status = Status {
            running: true,
            active_vus: 5,
        };
        let response = resource("status", "default", &status, "status document")
            .map_err(|err| format!("encode failed: {}", err))?;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, CONTENT_TYPE);

        let value: serde_json::Value = serde_json::from_slice(&response.body)
            .map_err(|err| format!("decode failed: {}", err))?;
        assert_eq!(value["data"]["type"], "status");
        assert_eq!(value["data"]["id"], "default");
        assert_eq!(value["data"]["attributes"]["running"], true);
        assert_eq!(value["data"]["attributes"]["active_vus"], 5);
        Ok(())
    }

    #[test]
    fn error_document_shape() -> Result<(), String> {
        let response = error_document(&ApiError::MetricNotFound);
        assert_eq!(response.status, 404);
        assert_eq!(response.content_type, CONTENT_TYPE);

        let document: ErrorDocument = serde_json::from_slice(&response.body)
            .map_err(|err| format!("decode failed: {}", err))?;
        assert_eq!(document.errors.len(), 1);
        let title = document
            .errors
            .first()
            .map(|entry| entry.title.clone())
            .unwrap_or_default();
        assert_eq!(title, "Metric not found");
        Ok(())
    }

    #[test]
    fn patch_keeps_absent_fields() -> Result<(), String> {
        let body = br#"{"data":{"attributes":{"active_vus":10}}}"#;
        let patch = decode_status_patch(body).map_err(|err| format!("decode failed: {}", err))?;
        let next = patch.apply(Status {
            running: true,
            active_vus: 5,
        });
        assert_eq!(
            next,
            Status {
                running: true,
                active_vus: 10,
            }
        );
        Ok(())
    }

    #[test]
    fn patch_with_empty_attributes_is_a_no_op() -> Result<(), String> {
        let body = br#"{"data":{"type":"status","id":"default","attributes":{}}}"#;
        let patch = decode_status_patch(body).map_err(|err| format!("decode failed: {}", err))?;
        let current = Status {
            running: true,
            active_vus: 7,
        };
        assert_eq!(patch.apply(current), current);
        Ok(())
    }

    #[test]
    fn malformed_patch_is_rejected() {
        assert!(decode_status_patch(b"not json").is_err());
        assert!(decode_status_patch(br#"{"attributes":{"running":false}}"#).is_err());
        assert!(decode_status_patch(br#"{"data":{"attributes":{"running":"maybe"}}}"#).is_err());
    }
}
