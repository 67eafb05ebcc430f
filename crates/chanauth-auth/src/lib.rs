//! ECDSA request signatures for channel-bound authentication.
//!
//! A caller proves its identity by signing a canonical digest of its HTTP
//! request, including the channel-binding token of its TLS connection, with
//! one of the private keys whose public halves are published in a
//! key directory. The signature travels in request headers as two base-10
//! integers `(r, s)` together with the key type that produced it. This crate
//! implements both halves of that exchange:
//!
//! - the verification side, which checks the signature against every key of
//!   the declared type that the directory lists for the claimed user, and
//! - the signing side, which a client uses to produce the headers.
//!
//! # Usage
//!
//! ```rust
//! use chanauth_auth::{HeaderNames, KeyType, PrivateKey, RequestSigner, verify_request};
//!
//! let key = PrivateKey::from_bytes(KeyType::P256, &[7u8; 32]).unwrap();
//! let directory = vec![key.public_key().to_text()];
//!
//! let (mut parts, ()) = http::Request::builder()
//!     .uri("/inbox")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//! let channel = b"tls-exporter:conn-1";
//! RequestSigner::new("ann@example.com", key).sign(&mut parts, channel).unwrap();
//!
//! let headers = HeaderNames::default();
//! verify_request("ann@example.com", &directory, &parts, &headers, channel).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction and hashing
//! - [`error`] - Authentication and key error types
//! - [`headers`] - Names of the request headers carrying identity and signature
//! - [`keys`] - Public/private key types and the textual key format
//! - [`lookup`] - Key directory trait and in-memory implementation
//! - [`sign`] - Client-side request signing
//! - [`verify`] - Signature verification against a user's keys

pub mod canonical;
pub mod error;
pub mod headers;
pub mod keys;
pub mod lookup;
pub mod sign;
pub mod verify;

pub use canonical::hash_user_request;
pub use error::{AuthError, KeyError};
pub use headers::HeaderNames;
pub use keys::{KeyType, PrivateKey, PublicKey, parse_public_key};
pub use lookup::{KeyLookup, StaticKeyLookup};
pub use sign::RequestSigner;
pub use verify::{parse_signature, verify_request};
