//! Key directory lookup.
//!
//! This module defines the [`KeyLookup`] trait for resolving a user's public
//! keys, along with a [`StaticKeyLookup`] for tests and small deployments.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Trait for looking up a user's public keys.
///
/// Keys are returned in directory text form (see [`crate::keys`]) and in the
/// order the directory lists them. Implementations may back this with a
/// remote directory service; the call is blocking from the caller's view.
pub trait KeyLookup: Send + Sync {
    /// Retrieve the public keys published for `user`.
    fn lookup(&self, user: &str) -> anyhow::Result<Vec<String>>;
}

impl<F> KeyLookup for F
where
    F: Fn(&str) -> anyhow::Result<Vec<String>> + Send + Sync,
{
    fn lookup(&self, user: &str) -> anyhow::Result<Vec<String>> {
        self(user)
    }
}

/// An in-memory key directory backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use chanauth_auth::lookup::{KeyLookup, StaticKeyLookup};
///
/// let directory = StaticKeyLookup::new(vec![(
///     "ann@example.com".to_owned(),
///     vec!["p256\n1\n2\n".to_owned()],
/// )]);
///
/// assert_eq!(directory.lookup("ann@example.com").unwrap().len(), 1);
/// assert!(directory.lookup("bob@example.com").is_err());
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct StaticKeyLookup {
    keys: HashMap<String, Vec<String>>,
}

impl StaticKeyLookup {
    /// Create a directory from `(user, keys)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            keys: entries.into_iter().collect(),
        }
    }

    /// Parse a directory from a JSON object mapping user names to key lists.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid key directory JSON")
    }

    /// Load a directory from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read key directory {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Number of users in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyLookup for StaticKeyLookup {
    fn lookup(&self, user: &str) -> anyhow::Result<Vec<String>> {
        self.keys
            .get(user)
            .cloned()
            .with_context(|| format!("user {user} not found in key directory"))
    }
}
