//! Hyper service that puts channel-bound authentication in front of a handler.
//!
//! This crate is the HTTP edge of chanauth. It handles:
//!
//! - **Handler** ([`handler`]): The [`AuthHandler`] trait every wrapped
//!   handler implements, and [`handler_fn`] for plain closures.
//!
//! - **Service** ([`service`]): [`AuthHttpService`], a hyper `Service` that
//!   runs the [`Authenticator`](chanauth_core::Authenticator) on each request
//!   and either rejects it or forwards it, with its [`Session`](chanauth_core::Session),
//!   to the handler.
//!
//! - **Response** ([`response`]): The JSON error payload sent on rejection.
//!
//! Responses are buffered: every body is an [`http_body_util::Full`] of
//! [`bytes::Bytes`].
//!
//! # Architecture
//!
//! ```text
//! HTTP Request (with SecureChannel extension from the TLS layer)
//!   -> AuthHttpService (hyper Service)
//!     -> Authenticator (session cache, then key lookup + signature check
//!                       on the blocking pool)
//!     -> 401 + JSON error                  when rejected
//!     -> AuthHandler::handle(session, req) otherwise
//!     -> x-request-id header
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use chanauth_auth::StaticKeyLookup;
//! use chanauth_core::{AuthConfig, Authenticator, Session};
//! use chanauth_http::{AuthHttpService, handler_fn};
//! use http_body_util::Full;
//!
//! let authenticator = Authenticator::new(
//!     AuthConfig::default(),
//!     Some(Arc::new(StaticKeyLookup::default())),
//! );
//! let hello = handler_fn(|session: Session, _req: http::Request<String>| async move {
//!     http::Response::new(Full::new(Bytes::from(format!("Hello, {}", session.user()))))
//! });
//! let service = AuthHttpService::wrap(authenticator, hello);
//! # let _ = service;
//! ```

pub mod handler;
pub mod response;
pub mod service;

pub use handler::{AuthHandler, HandlerFn, handler_fn};
pub use service::{AuthHttpService, REQUEST_ID_HEADER};
