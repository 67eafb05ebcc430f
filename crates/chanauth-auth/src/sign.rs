//! Client-side request signing.
//!
//! A client signs a request once per connection: the first request carries
//! the user, signature-type and signature headers, and later requests on the
//! same TLS connection only need the user header. Signing every request is
//! also accepted and simply bypasses the server's session cache.

use http::{HeaderName, HeaderValue};

use crate::canonical::hash_user_request;
use crate::error::KeyError;
use crate::headers::HeaderNames;
use crate::keys::PrivateKey;

/// Signs outgoing requests on behalf of one user.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    user: String,
    key: PrivateKey,
    headers: HeaderNames,
}

impl RequestSigner {
    /// Create a signer for `user` using the default header names.
    #[must_use]
    pub fn new(user: impl Into<String>, key: PrivateKey) -> Self {
        Self {
            user: user.into(),
            key,
            headers: HeaderNames::default(),
        }
    }

    /// Use custom header names, which must match the server's.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderNames) -> Self {
        self.headers = headers;
        self
    }

    /// Add only the user header, for follow-up requests on an
    /// already-authenticated connection.
    pub fn identify(&self, parts: &mut http::request::Parts) -> Result<(), KeyError> {
        insert(parts, &self.headers.user, &self.user)
    }

    /// Add the user, signature-type and signature headers to `parts`.
    ///
    /// `channel_binding` is the binding token of the connection the request
    /// will travel on. The signature only verifies on that connection.
    pub fn sign(
        &self,
        parts: &mut http::request::Parts,
        channel_binding: &[u8],
    ) -> Result<(), KeyError> {
        let key_type = self.key.key_type();
        let hash = hash_user_request(&self.user, parts, key_type.as_str(), channel_binding);
        let (r, s) = self.key.sign_prehash(&hash)?;

        self.identify(parts)?;
        insert(parts, &self.headers.signature_type, key_type.as_str())?;
        insert(parts, &self.headers.signature, &format!("{r} {s}"))
    }
}

fn insert(parts: &mut http::request::Parts, name: &str, value: &str) -> Result<(), KeyError> {
    let name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| KeyError::InvalidHeader(name.to_owned()))?;
    let value = HeaderValue::from_bytes(value.as_bytes())
        .map_err(|_| KeyError::InvalidHeader(name.to_string()))?;
    parts.headers.insert(name, value);
    Ok(())
}
