//! The outcome of authenticating a request.

use bytes::Bytes;
use chanauth_auth::AuthError;

/// Who the caller is, and whether that has been proven.
///
/// A session is either authenticated (non-empty user, no error) or carries
/// the reason authentication failed. The constructors are the only way to
/// build one, so the two states cannot be mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: String,
    authenticated: bool,
    channel_token: Bytes,
    error: Option<AuthError>,
}

impl Session {
    /// A session for a user whose signature has been verified.
    ///
    /// `channel_token` is the binding token of the connection the user was
    /// verified on, empty if the connection cannot be bound.
    #[must_use]
    pub fn authenticated(user: impl Into<String>, channel_token: Bytes) -> Self {
        let user = user.into();
        debug_assert!(!user.is_empty(), "authenticated sessions need a user");
        Self {
            user,
            authenticated: true,
            channel_token,
            error: None,
        }
    }

    /// A session recording a failed authentication attempt.
    #[must_use]
    pub fn unauthenticated(error: AuthError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Mark a cached binding as confirmed for the current request.
    #[must_use]
    pub(crate) fn revalidated(mut self) -> Self {
        self.authenticated = !self.user.is_empty();
        self.error = None;
        self
    }

    /// The user named by the session. May be empty; may be unauthenticated.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Whether the user in the session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The channel-binding token this session is bound to.
    #[must_use]
    pub fn channel_token(&self) -> &[u8] {
        &self.channel_token
    }

    /// Why authentication failed, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }
}
