//! Rejection responses.

use bytes::Bytes;
use chanauth_auth::AuthError;
use http_body_util::Full;

/// Content type of error payloads.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize an authentication failure into a JSON error body.
///
/// ```json
/// {
///   "error": "MissingSignature",
///   "message": "no signature in header"
/// }
/// ```
#[must_use]
pub fn error_to_json(error: &AuthError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "error": error.code(),
        "message": error.to_string(),
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert an authentication failure into a `401 Unauthorized` response.
#[must_use]
pub fn error_to_response(error: &AuthError, request_id: &str) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(http::StatusCode::UNAUTHORIZED)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .header(crate::service::REQUEST_ID_HEADER, request_id)
        .body(Full::new(Bytes::from(error_to_json(error))))
        .expect("valid error response")
}

/// A `500 Internal Server Error` for failures outside authentication itself.
#[must_use]
pub fn internal_error_response(request_id: &str) -> http::Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "InternalError",
        "message": "authentication could not be completed",
    });
    http::Response::builder()
        .status(http::StatusCode::INTERNAL_SERVER_ERROR)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .header(crate::service::REQUEST_ID_HEADER, request_id)
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("valid error response")
}
