//! Transport-agnostic HTTP handlers.
//!
//! Each handler returns a [`Response`] that a server adapter writes to the
//! wire unchanged. Successful conversions are sent as raw Markdown; every
//! failure is a JSON [`ErrorBody`] with a stable message.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ConversionError;
use crate::ingest::{SaveOutcome, SnapshotStore};
use crate::service::ConversionService;
use crate::snapshot::Snapshot;
use crate::storage::Storage;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// A finished HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

/// JSON body sent for every failure.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct SavedBody {
    status: &'static str,
}

/// `GET` handler: convert the active snapshot.
///
/// 200 with the Markdown, 404 when there is no snapshot, 503 when no plugin
/// produced output, 500 otherwise.
pub async fn get_markdown<S: Storage>(service: &ConversionService<S>) -> Response {
    match service.convert().await {
        Ok(markdown) => Response {
            status: 200,
            content_type: TEXT_PLAIN,
            body: markdown,
        },
        Err(e) => error_response(&e),
    }
}

/// `POST` handler: decode a JSON [`Snapshot`] and store it.
///
/// 201 when stored, 200 when unchanged, 400 for a bad payload.
pub async fn post_snapshot<S: Storage>(store: &SnapshotStore<S>, body: &[u8]) -> Response {
    let snapshot: Snapshot = match serde_json::from_slice(body) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Rejecting snapshot payload: {e}");
            return error_response(&ConversionError::InvalidSnapshot(e.to_string()));
        }
    };

    match store.save(&snapshot).await {
        Ok(SaveOutcome::Stored) => json_response(201, &SavedBody { status: "stored" }),
        Ok(SaveOutcome::Unchanged) => json_response(200, &SavedBody { status: "unchanged" }),
        Err(e) => error_response(&e),
    }
}

/// Map a failure to its status code and JSON body.
pub fn error_response(error: &ConversionError) -> Response {
    let (status, message) = match error {
        ConversionError::NotFound { .. } => (404, "snapshot not found"),
        ConversionError::NoPluginAvailable | ConversionError::AllPluginsDeclined { .. } => {
            (503, "conversion unavailable")
        }
        ConversionError::InvalidSnapshot(_) => (400, "invalid snapshot"),
        ConversionError::StorageWrite(_)
        | ConversionError::Config(_)
        | ConversionError::Internal(_) => (500, "internal server error"),
    };

    if status >= 500 {
        tracing::error!("Request failed: {error}");
    } else {
        tracing::debug!("Request failed: {error}");
    }

    json_response(
        status,
        &ErrorBody {
            error: message,
            timestamp: Utc::now(),
        },
    )
}

fn json_response(status: u16, body: &impl Serialize) -> Response {
    match serde_json::to_string(body) {
        Ok(body) => Response {
            status,
            content_type: APPLICATION_JSON,
            body,
        },
        Err(e) => {
            tracing::error!("Failed to encode response body: {e}");
            Response {
                status: 500,
                content_type: TEXT_PLAIN,
                body: "internal server error".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(response: &Response) -> serde_json::Value {
        assert_eq!(response.content_type, APPLICATION_JSON);
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn not_found_is_404() {
        let response = error_response(&ConversionError::NotFound {
            path: PathBuf::from("index.html"),
        });
        assert_eq!(response.status, 404);
        let body = parse(&response);
        assert_eq!(body["error"], "snapshot not found");
        assert!(body["timestamp"].as_str().unwrap().parse::<DateTime<Utc>>().is_ok());
    }

    #[test]
    fn plugin_failures_share_one_external_shape() {
        let none = error_response(&ConversionError::NoPluginAvailable);
        let declined = error_response(&ConversionError::AllPluginsDeclined { tried: 3 });
        assert_eq!(none.status, 503);
        assert_eq!(declined.status, 503);
        assert_eq!(parse(&none)["error"], parse(&declined)["error"]);
        assert_eq!(parse(&none)["error"], "conversion unavailable");
    }

    #[test]
    fn other_failures_are_500() {
        for error in [
            ConversionError::Internal("boom".into()),
            ConversionError::Config("bad".into()),
            ConversionError::StorageWrite("disk full".into()),
        ] {
            let response = error_response(&error);
            assert_eq!(response.status, 500);
            assert_eq!(parse(&response)["error"], "internal server error");
        }
    }

    #[test]
    fn invalid_snapshot_is_400() {
        let response = error_response(&ConversionError::InvalidSnapshot("empty".into()));
        assert_eq!(response.status, 400);
        assert_eq!(parse(&response)["error"], "invalid snapshot");
    }
}
