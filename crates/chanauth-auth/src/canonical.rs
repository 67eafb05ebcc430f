//! Canonical request construction.
//!
//! Signer and verifier hash the same canonical string:
//!
//! ```text
//! <user>\n
//! <HTTP method>\n
//! <path and query>\n
//! <signature type>\n
//! <channel binding, lowercase hex>\n
//! ```
//!
//! Binding the user into the digest means a signature produced for one user
//! never validates a request claiming another. Binding the signature type
//! prevents a signature from being re-labelled for a different curve. The
//! channel binding ties a signature to the TLS connection it was made on, so
//! captured headers cannot be replayed over another connection.

use sha2::{Digest, Sha256};

/// Build the canonical string for a request.
///
/// # Examples
///
/// ```
/// use chanauth_auth::canonical::build_canonical_request;
///
/// let canonical =
///     build_canonical_request("ann@example.com", "GET", "/inbox?limit=5", "p256", b"\x01\xab");
/// assert_eq!(canonical, "ann@example.com\nGET\n/inbox?limit=5\np256\n01ab\n");
/// ```
#[must_use]
pub fn build_canonical_request(
    user: &str,
    method: &str,
    path_and_query: &str,
    signature_type: &str,
    channel_binding: &[u8],
) -> String {
    let binding = hex::encode(channel_binding);
    format!("{user}\n{method}\n{path_and_query}\n{signature_type}\n{binding}\n")
}

/// SHA-256 digest of the canonical form of `parts` as signed by `user` on the
/// channel identified by `channel_binding`.
///
/// The origin-form target is used, so a client signing an absolute URI and a
/// server receiving the origin form arrive at the same digest.
#[must_use]
pub fn hash_user_request(
    user: &str,
    parts: &http::request::Parts,
    signature_type: &str,
    channel_binding: &[u8],
) -> Vec<u8> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);
    let canonical = build_canonical_request(
        user,
        parts.method.as_str(),
        path_and_query,
        signature_type,
        channel_binding,
    );
    Sha256::digest(canonical.as_bytes()).to_vec()
}
