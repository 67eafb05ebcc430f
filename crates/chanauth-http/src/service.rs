//! The authenticating hyper service.
//!
//! [`AuthHttpService`] wraps an [`AuthHandler`] and, for every request:
//!
//! 1. Runs the [`Authenticator`] on the request head. Key lookups may block,
//!    so this step runs on tokio's blocking thread pool.
//! 2. On failure, either answers `401 Unauthorized` with a JSON error body
//!    (the handler is not called) or, when unauthenticated callers are
//!    allowed, hands the handler a session carrying only the error.
//! 3. On success, calls the handler with the authenticated session.
//! 4. Tags the response with an `x-request-id` header.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use chanauth_core::{Authenticator, Session};
use http_body_util::Full;
use hyper::service::Service;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::handler::AuthHandler;
use crate::response::{error_to_response, internal_error_response};

/// Header carrying the per-request id on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Hyper `Service` that authenticates requests before handing them to `H`.
///
/// Clones share the handler and the authenticator, and therefore one session
/// cache.
#[derive(Debug)]
pub struct AuthHttpService<H> {
    handler: Arc<H>,
    authenticator: Authenticator,
}

impl<H> AuthHttpService<H> {
    /// Wrap `handler` so that it only sees requests vetted by `authenticator`.
    #[must_use]
    pub fn wrap(authenticator: Authenticator, handler: H) -> Self {
        Self::from_shared(authenticator, Arc::new(handler))
    }

    /// Wrap a handler that is already shared.
    #[must_use]
    pub fn from_shared(authenticator: Authenticator, handler: Arc<H>) -> Self {
        Self {
            handler,
            authenticator,
        }
    }

    /// The authenticator in front of the handler.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }
}

impl<H> Clone for AuthHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<H, B> Service<http::Request<B>> for AuthHttpService<H>
where
    H: AuthHandler<B>,
    B: Send + 'static,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let authenticator = self.authenticator.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response =
                process_request(req, handler.as_ref(), &authenticator, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Authenticate the request and dispatch it, or reject it.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    authenticator: &Authenticator,
    request_id: &str,
) -> http::Response<Full<Bytes>>
where
    H: AuthHandler<B>,
{
    let (parts, body) = req.into_parts();

    let blocking = authenticator.clone();
    let authenticated = tokio::task::spawn_blocking(move || {
        let outcome = blocking.authenticate(&parts);
        (parts, outcome)
    })
    .await;
    let (parts, outcome) = match authenticated {
        Ok(done) => done,
        Err(err) => {
            error!(error = %err, request_id, "authentication task failed");
            return internal_error_response(request_id);
        }
    };

    let session = match outcome {
        Ok(session) => {
            debug!(user = session.user(), request_id, "request authenticated");
            session
        }
        Err(err) if authenticator.config().allow_unauthenticated => {
            debug!(
                error = %err,
                code = err.code(),
                request_id,
                "passing unauthenticated request to handler"
            );
            Session::unauthenticated(err)
        }
        Err(err) => {
            warn!(
                method = %parts.method,
                uri = %parts.uri,
                error = %err,
                code = err.code(),
                request_id,
                "authentication failed"
            );
            return error_to_response(&err, request_id);
        }
    };

    handler
        .handle(session, http::Request::from_parts(parts, body))
        .await
}

/// Add the headers common to every response.
fn add_common_headers(
    mut response: http::Response<Full<Bytes>>,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, hv);
    }
    response
}
