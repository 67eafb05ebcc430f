//! Signature verification against a user's published keys.
//!
//! The verification flow is:
//!
//! 1. Read the signature and signature-type headers.
//! 2. Parse the signature as exactly two base-10 integers `(r, s)`.
//! 3. Walk the user's keys in directory order. Keys of another type are
//!    skipped. For each key of the declared type, check `(r, s)` against the
//!    canonical request digest; the first key that validates ends the walk.
//! 4. If no key of the declared type exists the result is
//!    [`AuthError::NoMatchingKeys`]; if some exist but none validates it is
//!    [`AuthError::VerificationFailed`].
//!
//! The main entry point is [`verify_request`].

use num_bigint::BigUint;
use tracing::{debug, warn};

use crate::canonical::hash_user_request;
use crate::error::AuthError;
use crate::headers::{HeaderNames, header_str};
use crate::keys::{parse_decimal, parse_public_key};

/// Parse a signature header value into `(r, s)`.
///
/// # Examples
///
/// ```
/// use chanauth_auth::verify::parse_signature;
///
/// let (r, s) = parse_signature("123 456").unwrap();
/// assert_eq!(r.to_string(), "123");
/// assert_eq!(s.to_string(), "456");
/// assert!(parse_signature("123").is_err());
/// ```
pub fn parse_signature(text: &str) -> Result<(BigUint, BigUint), AuthError> {
    let pieces: Vec<&str> = text.split_whitespace().collect();
    let [r, s] = pieces.as_slice() else {
        return Err(AuthError::MalformedSignature(format!(
            "expected two integers in signature, got {}",
            pieces.len()
        )));
    };

    let r = parse_decimal(r)
        .ok_or_else(|| AuthError::MalformedSignature("r is not a base-10 integer".to_owned()))?;
    let s = parse_decimal(s)
        .ok_or_else(|| AuthError::MalformedSignature("s is not a base-10 integer".to_owned()))?;
    Ok((r, s))
}

/// Verify that `user` signed the request in `parts` with one of `keys`.
///
/// `keys` are public keys in directory text form, in directory order. A key
/// that cannot be decoded is skipped with a warning; it does not fail the
/// request on its own. `channel_binding` is the token of the connection the
/// request arrived on and must match the one the client signed with.
pub fn verify_request(
    user: &str,
    keys: &[String],
    parts: &http::request::Parts,
    headers: &HeaderNames,
    channel_binding: &[u8],
) -> Result<(), AuthError> {
    let signature =
        header_str(&parts.headers, &headers.signature).ok_or(AuthError::MissingSignature)?;
    let needed_type =
        header_str(&parts.headers, &headers.signature_type).ok_or(AuthError::MissingKeyType)?;
    let (r, s) = parse_signature(signature)?;

    let hash = hash_user_request(user, parts, needed_type, channel_binding);
    let mut candidates = 0usize;

    for (index, text) in keys.iter().enumerate() {
        let (key, key_type) = match parse_public_key(text) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(user, index, error = %err, "skipping undecodable public key");
                continue;
            }
        };
        if key_type.as_str() != needed_type {
            continue;
        }

        candidates += 1;
        if key.verify_prehash(&hash, &r, &s) {
            debug!(user, index, %key_type, "signature verified");
            return Ok(());
        }
        debug!(user, index, %key_type, "signature did not verify with key");
    }

    if candidates == 0 {
        return Err(AuthError::NoMatchingKeys {
            user: user.to_owned(),
            key_type: needed_type.to_owned(),
        });
    }
    Err(AuthError::VerificationFailed(user.to_owned()))
}
