//! The handler trait wrapped by [`AuthHttpService`](crate::AuthHttpService).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use chanauth_core::Session;
use http_body_util::Full;

/// A request handler that receives the caller's [`Session`].
///
/// When the service is configured to reject unauthenticated callers, the
/// session is always authenticated. Otherwise the handler must check
/// [`Session::is_authenticated`] itself; a failed session carries the reason
/// in [`Session::error`].
pub trait AuthHandler<B>: Send + Sync + 'static {
    /// Handle one request.
    fn handle(
        &self,
        session: Session,
        req: http::Request<B>,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>>;
}

/// Handler built from a closure by [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Turn an async closure taking `(Session, Request)` into an [`AuthHandler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

impl<F, Fut, B> AuthHandler<B> for HandlerFn<F>
where
    F: Fn(Session, http::Request<B>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = http::Response<Full<Bytes>>> + Send + 'static,
{
    fn handle(
        &self,
        session: Session,
        req: http::Request<B>,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>> {
        Box::pin((self.f)(session, req))
    }
}
