//! Sessions, the channel-bound session cache, and the authenticator.
//!
//! A caller signs one request per TLS connection. After that signature has
//! been verified, the connection's channel-binding token is remembered in a
//! bounded [`SessionStore`]; later requests on the same connection that claim
//! the same user are authenticated from the cache without touching the key
//! directory or doing any cryptography.
//!
//! [`Authenticator`] drives the whole decision for one request and produces a
//! [`Session`] or an [`AuthError`](chanauth_auth::AuthError).
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chanauth_auth::StaticKeyLookup;
//! use chanauth_core::{AuthConfig, Authenticator};
//!
//! let directory = StaticKeyLookup::default();
//! let authenticator = Authenticator::new(AuthConfig::default(), Some(Arc::new(directory)));
//! assert!(authenticator.sessions().is_empty());
//! ```

mod authenticator;
mod channel;
mod config;
mod session;
mod store;

pub use authenticator::Authenticator;
pub use channel::{SecureChannel, fingerprint};
pub use config::AuthConfig;
pub use session::Session;
pub use store::{DEFAULT_SESSION_CAPACITY, SessionStore};
