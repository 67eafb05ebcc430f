//! Per-request authentication decision.
//!
//! For each request [`Authenticator::authenticate`]:
//!
//! 1. Requires a non-empty user header.
//! 2. Requires a [`SecureChannel`] extension, i.e. that the request came in
//!    over TLS.
//! 3. If the channel has a binding token and the [`SessionStore`] holds a
//!    session for it naming the same user, accepts the request right away.
//!    A binding for a different user is ignored; the claim is verified from
//!    scratch.
//! 4. Otherwise looks up the user's keys and verifies the request signature,
//!    which must have been made over the channel's binding token. On success the new session is bound to the channel token so later
//!    requests on the connection take step 3.
//!
//! Failures are never cached and never retried here.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chanauth_auth::headers::header_str;
use chanauth_auth::{AuthError, HeaderNames, KeyLookup, verify_request};
use tracing::debug;

use crate::channel::{SecureChannel, fingerprint};
use crate::config::AuthConfig;
use crate::session::Session;
use crate::store::SessionStore;

/// Authenticates requests against a key directory, remembering verified
/// channels.
///
/// Cloning is cheap and clones share one session store. Independent
/// authenticators never share state.
#[derive(Clone)]
pub struct Authenticator {
    config: Arc<AuthConfig>,
    headers: Arc<HeaderNames>,
    key_lookup: Option<Arc<dyn KeyLookup>>,
    sessions: Arc<SessionStore>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("key_lookup", &self.key_lookup.as_ref().map(|_| "..."))
            .field("sessions", &self.sessions)
            .finish()
    }
}

impl Authenticator {
    /// Create an authenticator with its own session store.
    ///
    /// Without a `key_lookup` no request can be freshly verified; every such
    /// attempt fails with [`AuthError::KeyLookupUnavailable`].
    #[must_use]
    pub fn new(config: AuthConfig, key_lookup: Option<Arc<dyn KeyLookup>>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_capacity));
        let headers = Arc::new(config.header_names());
        Self {
            config: Arc::new(config),
            headers,
            key_lookup,
            sessions,
        }
    }

    /// The configuration this authenticator was built with.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// The session cache.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Decide who sent the request described by `parts`.
    pub fn authenticate(&self, parts: &http::request::Parts) -> Result<Session, AuthError> {
        let user =
            header_str(&parts.headers, &self.headers.user).ok_or(AuthError::MissingUsername)?;
        let channel = parts
            .extensions
            .get::<SecureChannel>()
            .ok_or(AuthError::NotSecureChannel)?;
        let token = channel.binding();

        if !token.is_empty() {
            match self.sessions.lookup(token) {
                Some(session) if session.user() == user => {
                    debug!(user, channel = %fingerprint(token), "authenticated from session cache");
                    return Ok(session.revalidated());
                }
                Some(session) => {
                    debug!(
                        user,
                        bound_user = session.user(),
                        channel = %fingerprint(token),
                        "channel bound to another user, verifying from scratch"
                    );
                }
                None => {
                    debug!(user, channel = %fingerprint(token), "no session for channel");
                }
            }
        }

        let lookup = self
            .key_lookup
            .as_ref()
            .ok_or(AuthError::KeyLookupUnavailable)?;
        let keys = lookup
            .lookup(user)
            .map_err(|e| AuthError::KeyLookupFailed {
                user: user.to_owned(),
                reason: format!("{e:#}"),
            })?;
        verify_request(user, &keys, parts, &self.headers, token)?;

        let session = Session::authenticated(user, Bytes::copy_from_slice(token));
        if !token.is_empty() {
            self.sessions.bind(token, session.clone());
        }
        debug!(user, channel = %fingerprint(token), "authenticated by signature");
        Ok(session)
    }
}
