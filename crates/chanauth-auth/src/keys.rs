//! Key types and the textual public-key format.
//!
//! A public key is published in the directory as three lines:
//!
//! ```text
//! p256
//! 48439561293906451759052585252797914202762949526041747995844080717082404635286
//! 36134250956749795798585127919587881956611106672985015071877198253568414405109
//! ```
//!
//! The first line is the [`KeyType`], the next two are the affine `x` and `y`
//! coordinates of the curve point in base 10.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};

use crate::error::KeyError;

/// The curve a key lives on, as named in the signature-type header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// NIST P-256.
    P256,
    /// NIST P-384.
    P384,
}

impl KeyType {
    /// The identifier used in key text and in the signature-type header.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P256 => "p256",
            Self::P384 => "p384",
        }
    }

    /// Size in bytes of a field element (and of `r`, `s`) on this curve.
    #[must_use]
    pub fn field_size(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
        }
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p256" => Ok(Self::P256),
            "p384" => Ok(Self::P384),
            other => Err(KeyError::UnknownKeyType(other.to_owned())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded ECDSA public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// P-256 verifying key.
    P256(p256::ecdsa::VerifyingKey),
    /// P-384 verifying key.
    P384(p384::ecdsa::VerifyingKey),
}

impl PublicKey {
    /// The curve of this key.
    #[must_use]
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::P256(_) => KeyType::P256,
            Self::P384(_) => KeyType::P384,
        }
    }

    /// Check `(r, s)` against a precomputed digest.
    ///
    /// Integers that do not fit the curve's field, or that are zero or not
    /// below the group order, never verify.
    #[must_use]
    pub fn verify_prehash(&self, hash: &[u8], r: &BigUint, s: &BigUint) -> bool {
        let size = self.key_type().field_size();
        let (Some(r), Some(s)) = (to_fixed_be(r, size), to_fixed_be(s, size)) else {
            return false;
        };

        match self {
            Self::P256(vk) => {
                let Ok(sig) = p256::ecdsa::Signature::from_scalars(
                    p256::FieldBytes::clone_from_slice(&r),
                    p256::FieldBytes::clone_from_slice(&s),
                ) else {
                    return false;
                };
                vk.verify_prehash(hash, &sig).is_ok()
            }
            Self::P384(vk) => {
                let Ok(sig) = p384::ecdsa::Signature::from_scalars(
                    p384::FieldBytes::clone_from_slice(&r),
                    p384::FieldBytes::clone_from_slice(&s),
                ) else {
                    return false;
                };
                vk.verify_prehash(hash, &sig).is_ok()
            }
        }
    }

    /// Render the key in the directory text format.
    #[must_use]
    pub fn to_text(&self) -> String {
        let (x, y) = match self {
            Self::P256(vk) => {
                let point = vk.to_encoded_point(false);
                (coordinate(point.x()), coordinate(point.y()))
            }
            Self::P384(vk) => {
                let point = vk.to_encoded_point(false);
                (coordinate(point.x()), coordinate(point.y()))
            }
        };
        format!("{}\n{x}\n{y}\n", self.key_type())
    }
}

/// Decode a public key from its directory text.
///
/// Returns the key together with its declared type.
pub fn parse_public_key(text: &str) -> Result<(PublicKey, KeyType), KeyError> {
    let mut lines = text.lines().map(str::trim);

    let key_type: KeyType = lines
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| KeyError::Malformed("empty key".to_owned()))?
        .parse()?;
    let x = parse_coordinate(lines.next(), "x")?;
    let y = parse_coordinate(lines.next(), "y")?;
    if lines.any(|l| !l.is_empty()) {
        return Err(KeyError::Malformed("trailing data after y".to_owned()));
    }

    let size = key_type.field_size();
    let (Some(x), Some(y)) = (to_fixed_be(&x, size), to_fixed_be(&y, size)) else {
        return Err(KeyError::InvalidKeyMaterial(key_type.as_str()));
    };
    let mut sec1 = Vec::with_capacity(1 + 2 * size);
    sec1.push(0x04);
    sec1.extend_from_slice(&x);
    sec1.extend_from_slice(&y);

    let key = match key_type {
        KeyType::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
            .map(PublicKey::P256)
            .map_err(|_| KeyError::InvalidKeyMaterial(key_type.as_str()))?,
        KeyType::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
            .map(PublicKey::P384)
            .map_err(|_| KeyError::InvalidKeyMaterial(key_type.as_str()))?,
    };

    Ok((key, key_type))
}

/// An ECDSA private key, used by clients to sign requests.
#[derive(Clone)]
pub enum PrivateKey {
    /// P-256 signing key.
    P256(p256::ecdsa::SigningKey),
    /// P-384 signing key.
    P384(p384::ecdsa::SigningKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey")
            .field(&self.key_type())
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Build a private key from its big-endian secret scalar.
    pub fn from_bytes(key_type: KeyType, secret: &[u8]) -> Result<Self, KeyError> {
        match key_type {
            KeyType::P256 => p256::ecdsa::SigningKey::from_slice(secret)
                .map(Self::P256)
                .map_err(|_| KeyError::InvalidKeyMaterial(key_type.as_str())),
            KeyType::P384 => p384::ecdsa::SigningKey::from_slice(secret)
                .map(Self::P384)
                .map_err(|_| KeyError::InvalidKeyMaterial(key_type.as_str())),
        }
    }

    /// The curve of this key.
    #[must_use]
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::P256(_) => KeyType::P256,
            Self::P384(_) => KeyType::P384,
        }
    }

    /// The matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::P256(sk) => PublicKey::P256(sk.verifying_key().clone()),
            Self::P384(sk) => PublicKey::P384(sk.verifying_key().clone()),
        }
    }

    /// Sign a precomputed digest, returning `(r, s)`.
    pub fn sign_prehash(&self, hash: &[u8]) -> Result<(BigUint, BigUint), KeyError> {
        match self {
            Self::P256(sk) => {
                let sig: p256::ecdsa::Signature = sk
                    .sign_prehash(hash)
                    .map_err(|e| KeyError::SigningFailed(e.to_string()))?;
                let (r, s) = sig.split_bytes();
                Ok((BigUint::from_bytes_be(&r), BigUint::from_bytes_be(&s)))
            }
            Self::P384(sk) => {
                let sig: p384::ecdsa::Signature = sk
                    .sign_prehash(hash)
                    .map_err(|e| KeyError::SigningFailed(e.to_string()))?;
                let (r, s) = sig.split_bytes();
                Ok((BigUint::from_bytes_be(&r), BigUint::from_bytes_be(&s)))
            }
        }
    }
}

/// Parse one base-10 coordinate line.
fn parse_coordinate(line: Option<&str>, name: &str) -> Result<BigUint, KeyError> {
    let line = line
        .filter(|l| !l.is_empty())
        .ok_or_else(|| KeyError::Malformed(format!("missing {name} coordinate")))?;
    parse_decimal(line)
        .ok_or_else(|| KeyError::Malformed(format!("{name} coordinate is not a decimal integer")))
}

/// Parse a strictly decimal unsigned integer (ASCII digits only).
pub(crate) fn parse_decimal(text: &str) -> Option<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
}

/// Left-pad the big-endian encoding of `n` to `size` bytes.
///
/// Returns `None` if `n` does not fit.
fn to_fixed_be(n: &BigUint, size: usize) -> Option<Vec<u8>> {
    let bytes = n.to_bytes_be();
    if bytes.len() > size {
        return None;
    }
    let mut out = vec![0u8; size - bytes.len()];
    out.extend_from_slice(&bytes);
    Some(out)
}

fn coordinate<B: AsRef<[u8]>>(bytes: Option<B>) -> BigUint {
    bytes.map_or_else(BigUint::default, |b| BigUint::from_bytes_be(b.as_ref()))
}
