//! Request-body handling shared by the JSON endpoints.
//!
//! Form fields that arrive as anything other than a JSON string are read as
//! empty so the validation rules report them. Bodies that cannot be parsed
//! at all are rejected with the usual error envelope.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Error, ErrorCode};

/// Message returned when a body is not a JSON object of the expected shape.
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be a JSON object.";

/// Read a string field, treating any other JSON value as `""`.
///
/// Pair with `#[serde(default)]` so a missing field is empty too.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

/// JSON extractor settings for every `/api/v1` endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(malformed_body)
}

fn malformed_body(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(%error, "request body rejected");
    Error::new(ErrorCode::InvalidRequest, MALFORMED_BODY_MESSAGE).into()
}
