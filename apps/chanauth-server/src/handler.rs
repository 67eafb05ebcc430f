//! The greeting handler served behind authentication.

use bytes::Bytes;
use chanauth_core::Session;
use http_body_util::Full;

/// Greet the authenticated caller.
///
/// Only reachable without authentication when `AUTH_ALLOW_UNAUTHENTICATED`
/// is set, in which case the caller is refused here instead.
pub async fn hello<B>(session: Session, _req: http::Request<B>) -> http::Response<Full<Bytes>> {
    if session.is_authenticated() {
        return text(http::StatusCode::OK, format!("Hello, {}", session.user()));
    }

    let reason = session
        .error()
        .map_or_else(|| String::from("unknown"), ToString::to_string);
    text(
        http::StatusCode::FORBIDDEN,
        format!("Hello, stranger ({reason})"),
    )
}

fn text(status: http::StatusCode, body: String) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .expect("static text response should be valid")
}
