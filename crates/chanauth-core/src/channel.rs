//! The secure-transport channel a request arrived on.

use std::fmt;

use bytes::Bytes;

/// Request extension inserted by the transport for requests that arrived
/// over TLS.
///
/// `binding` is the channel-binding token of the TLS connection: unique per
/// handshake and unknown to anyone outside it. It may be empty when the
/// transport cannot derive one, in which case every request on the
/// connection must be signed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecureChannel {
    binding: Bytes,
}

impl SecureChannel {
    /// A channel with the given binding token.
    #[must_use]
    pub fn new(binding: impl Into<Bytes>) -> Self {
        Self {
            binding: binding.into(),
        }
    }

    /// A secure channel that offers no binding token.
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    /// The channel-binding token, possibly empty.
    #[must_use]
    pub fn binding(&self) -> &[u8] {
        &self.binding
    }
}

impl fmt::Debug for SecureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureChannel")
            .field("binding", &fingerprint(&self.binding))
            .finish()
    }
}

/// Short hex fingerprint of a channel token, safe to log.
///
/// # Examples
///
/// ```
/// assert_eq!(chanauth_core::fingerprint(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// assert_eq!(chanauth_core::fingerprint(&[0u8; 32]), "0000000000000000");
/// ```
#[must_use]
pub fn fingerprint(token: &[u8]) -> String {
    hex::encode(&token[..token.len().min(8)])
}
