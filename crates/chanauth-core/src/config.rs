//! Authentication configuration.
//!
//! Provides [`AuthConfig`]. Values are loaded from environment variables,
//! falling back to defaults. The key directory is not part of this struct: it
//! is a live collaborator handed to the
//! [`Authenticator`](crate::Authenticator) alongside the config.

use chanauth_auth::HeaderNames;
use chanauth_auth::headers::{
    DEFAULT_SIGNATURE_HEADER, DEFAULT_SIGNATURE_TYPE_HEADER, DEFAULT_USER_HEADER,
};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::store::DEFAULT_SESSION_CAPACITY;

/// Authentication configuration.
///
/// # Examples
///
/// ```
/// use chanauth_core::AuthConfig;
///
/// let config = AuthConfig::default();
/// assert!(!config.allow_unauthenticated);
/// assert_eq!(config.session_capacity, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Pass failed authentications to the handler instead of rejecting them.
    /// The handler then decides via `Session::is_authenticated`.
    #[builder(default = false)]
    pub allow_unauthenticated: bool,

    /// Number of channel bindings remembered before the oldest is evicted.
    #[builder(default = DEFAULT_SESSION_CAPACITY)]
    pub session_capacity: usize,

    /// Header carrying the claimed user name.
    #[builder(default = String::from(DEFAULT_USER_HEADER))]
    pub user_header: String,

    /// Header carrying the signature integers.
    #[builder(default = String::from(DEFAULT_SIGNATURE_HEADER))]
    pub signature_header: String,

    /// Header carrying the signature type.
    #[builder(default = String::from(DEFAULT_SIGNATURE_TYPE_HEADER))]
    pub signature_type_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_unauthenticated: false,
            session_capacity: DEFAULT_SESSION_CAPACITY,
            user_header: String::from(DEFAULT_USER_HEADER),
            signature_header: String::from(DEFAULT_SIGNATURE_HEADER),
            signature_type_header: String::from(DEFAULT_SIGNATURE_TYPE_HEADER),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AUTH_ALLOW_UNAUTHENTICATED` | `false` |
    /// | `AUTH_SESSION_CAPACITY` | `1000` |
    /// | `AUTH_USER_HEADER` | `x-chanauth-user` |
    /// | `AUTH_SIGNATURE_HEADER` | `x-chanauth-signature` |
    /// | `AUTH_SIGNATURE_TYPE_HEADER` | `x-chanauth-signature-type` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("AUTH_ALLOW_UNAUTHENTICATED") {
            config.allow_unauthenticated = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("AUTH_SESSION_CAPACITY") {
            if let Ok(n) = v.parse::<usize>() {
                config.session_capacity = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("AUTH_USER_HEADER") {
            config.user_header = v;
        }
        if let Ok(v) = std::env::var("AUTH_SIGNATURE_HEADER") {
            config.signature_header = v;
        }
        if let Ok(v) = std::env::var("AUTH_SIGNATURE_TYPE_HEADER") {
            config.signature_type_header = v;
        }

        config
    }

    /// The header names as used by the verifier.
    #[must_use]
    pub fn header_names(&self) -> HeaderNames {
        HeaderNames {
            user: self.user_header.clone(),
            signature: self.signature_header.clone(),
            signature_type: self.signature_type_header.clone(),
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
