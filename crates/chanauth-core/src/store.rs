//! Bounded, concurrent map from channel-binding token to session.
//!
//! [`SessionStore`] remembers which user was verified on which TLS
//! connection. It is bounded: once full, the least recently used binding is
//! evicted and that connection simply has to sign again. The bound therefore
//! also caps how many authenticated connections the process can serve from
//! the cache at once, so it should not be set to a small number.

use std::fmt;
use std::num::NonZeroUsize;

use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::channel::fingerprint;
use crate::session::Session;

/// Default number of channel bindings remembered.
pub const DEFAULT_SESSION_CAPACITY: usize = 1000;

/// Thread-safe LRU cache of sessions keyed by channel-binding token.
///
/// All methods take `&self`; callers share the store behind an `Arc` and
/// never lock around it.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use chanauth_core::{Session, SessionStore};
///
/// let store = SessionStore::new(2);
/// store.bind(b"token", Session::authenticated("ann", Bytes::from_static(b"token")));
/// assert_eq!(store.lookup(b"token").unwrap().user(), "ann");
/// assert!(store.lookup(b"other").is_none());
/// ```
pub struct SessionStore {
    inner: Mutex<LruCache<Bytes, Session>>,
}

impl SessionStore {
    /// Create a store holding at most `capacity` bindings (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Bind `token` to `session`, replacing any previous binding.
    ///
    /// Empty tokens cannot tell connections apart and are never stored; the
    /// call is then a logged no-op and returns `false`.
    pub fn bind(&self, token: &[u8], session: Session) -> bool {
        if token.is_empty() {
            warn!(user = session.user(), "refusing to bind session to empty channel token");
            return false;
        }

        let evicted = self
            .inner
            .lock()
            .push(Bytes::copy_from_slice(token), session)
            .filter(|(key, _)| key.as_ref() != token);
        if let Some((key, old)) = evicted {
            debug!(
                channel = %fingerprint(&key),
                user = old.user(),
                "evicted least recently used session"
            );
        }
        true
    }

    /// The session bound to `token`, if any.
    ///
    /// A hit counts as a use for eviction purposes; the stored session itself
    /// is never changed.
    #[must_use]
    pub fn lookup(&self, token: &[u8]) -> Option<Session> {
        if token.is_empty() {
            return None;
        }
        self.inner.lock().get(token).cloned()
    }

    /// Number of bindings currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the store holds no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of bindings held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SessionStore")
            .field("len", &inner.len())
            .field("capacity", &inner.cap())
            .finish()
    }
}
