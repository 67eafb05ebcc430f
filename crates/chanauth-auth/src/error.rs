//! Error types for channel-bound authentication.
//!
//! [`AuthError`] enumerates every reason an authentication attempt can fail.
//! It is `Clone` because a failed attempt may be handed to a request handler
//! inside a session rather than turned into a response. [`KeyError`] covers
//! decoding and using key material.

/// Reasons an authentication attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request does not name a user. A user header that is empty or
    /// not valid UTF-8 counts as absent.
    #[error("missing username in HTTP header")]
    MissingUsername,

    /// The request did not arrive over a secure transport channel.
    #[error("not a TLS secure connection")]
    NotSecureChannel,

    /// No key directory is configured, so nobody can be verified.
    #[error("cannot authenticate: internal error: missing key lookup")]
    KeyLookupUnavailable,

    /// The key directory could not produce keys for the user.
    #[error("key lookup failed for user {user}: {reason}")]
    KeyLookupFailed {
        /// The user whose keys were requested.
        user: String,
        /// Why the directory failed.
        reason: String,
    },

    /// The signature header is absent or empty.
    #[error("no signature in header")]
    MissingSignature,

    /// The signature-type header is absent or empty.
    #[error("no signature type in header")]
    MissingKeyType,

    /// The signature header is not exactly two base-10 integers.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// None of the user's keys has the declared signature type.
    #[error("no keys of type {key_type} found for user {user}")]
    NoMatchingKeys {
        /// The user whose keys were searched.
        user: String,
        /// The declared signature type.
        key_type: String,
    },

    /// Keys of the declared type exist but none validates the signature.
    #[error("signature verification failed for user {0}")]
    VerificationFailed(String),
}

impl AuthError {
    /// Stable machine-readable name of the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUsername => "MissingUsername",
            Self::NotSecureChannel => "NotSecureChannel",
            Self::KeyLookupUnavailable => "KeyLookupUnavailable",
            Self::KeyLookupFailed { .. } => "KeyLookupFailed",
            Self::MissingSignature => "MissingSignature",
            Self::MissingKeyType => "MissingKeyType",
            Self::MalformedSignature(_) => "MalformedSignature",
            Self::NoMatchingKeys { .. } => "NoMatchingKeys",
            Self::VerificationFailed(_) => "VerificationFailed",
        }
    }
}

/// Errors from decoding or using key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The key names a type this crate does not implement.
    #[error("unknown key type: {0}")]
    UnknownKeyType(String),

    /// The key text does not follow the `<type>\n<x>\n<y>\n` layout.
    #[error("malformed public key: {0}")]
    Malformed(String),

    /// The coordinates or scalar do not form a valid key on the curve.
    #[error("invalid key material for {0}")]
    InvalidKeyMaterial(&'static str),

    /// The signing primitive rejected the digest.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// A value cannot be carried in an HTTP header.
    #[error("invalid header value for {0}")]
    InvalidHeader(String),
}
