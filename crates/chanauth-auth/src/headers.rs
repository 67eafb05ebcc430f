//! Names of the request headers that carry identity and signature.

use http::HeaderMap;

/// Default header carrying the claimed user name.
pub const DEFAULT_USER_HEADER: &str = "x-chanauth-user";

/// Default header carrying the signature `"<r> <s>"`.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-chanauth-signature";

/// Default header carrying the signature type (`p256`, `p384`).
pub const DEFAULT_SIGNATURE_TYPE_HEADER: &str = "x-chanauth-signature-type";

/// The set of header names used by a deployment.
///
/// Signer and verifier must agree on these names; they are configuration,
/// not part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderNames {
    /// Header with the claimed user name.
    pub user: String,
    /// Header with the two signature integers.
    pub signature: String,
    /// Header with the signature type.
    pub signature_type: String,
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER_HEADER.to_owned(),
            signature: DEFAULT_SIGNATURE_HEADER.to_owned(),
            signature_type: DEFAULT_SIGNATURE_TYPE_HEADER.to_owned(),
        }
    }
}

/// Read a header as a non-empty UTF-8 string.
///
/// Absent, empty and non-UTF-8 values are all reported as `None`.
#[must_use]
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .filter(|v| !v.is_empty())
}
