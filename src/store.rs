//! The preferences store service.
//!
//! [`Prefs`] is the sole mediator between typed bindings and the
//! persistence collaborator: every read, write, and removal funnels
//! through one instance, scoped either to the global domain or to a named
//! suite.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::key::PrefKey;
use crate::platform::{self, Persistence};
use crate::value::Value;

/// A preferences store scoped to one domain.
///
/// Create one with [`Prefs::open`], or use the process-wide shared
/// instance via [`Prefs::shared`]. All operations are synchronous calls
/// into the persistence collaborator; the store adds no locking,
/// queueing, or retry logic of its own.
///
/// # Example
///
/// ```ignore
/// use prefstore::prelude::*;
///
/// let prefs = Prefs::open(Some("com.app.prefs"))?;
/// prefs.set("launchCount", 5)?;
/// assert_eq!(prefs.int("launchCount"), 5);
/// ```
pub struct Prefs {
    persistence: Arc<dyn Persistence>,
    domain: Option<String>,
}

impl std::fmt::Debug for Prefs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefs")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Process-wide shared store, lazily opened on the global domain.
///
/// Replaceable via `Prefs::replace_shared`; holders of a previously
/// fetched `Arc` keep operating against the old domain until they
/// re-fetch.
static SHARED: Lazy<RwLock<Arc<Prefs>>> = Lazy::new(|| match Prefs::open(None) {
    Ok(prefs) => RwLock::new(prefs),
    Err(e) => panic!("cannot open the default preferences store: {e}"),
});

impl Prefs {
    /// Open a store for `domain` against the ambient persistence
    /// collaborator.
    ///
    /// `None` opens the global/default domain, `Some(name)` a named
    /// suite. Opening fails only if the collaborator cannot open the
    /// domain's backing store; that failure is a startup error with no
    /// retry path.
    pub fn open(domain: Option<&str>) -> Result<Arc<Self>> {
        Self::with_persistence(domain, platform::collaborator())
    }

    /// Open a store for `domain` against an explicit collaborator.
    ///
    /// Useful for tests and for embedding several independent stores in
    /// one process.
    pub fn with_persistence(
        domain: Option<&str>,
        persistence: Arc<dyn Persistence>,
    ) -> Result<Arc<Self>> {
        persistence.open_domain(domain)?;
        Ok(Arc::new(Self {
            persistence,
            domain: domain.map(str::to_owned),
        }))
    }

    /// The process-wide shared store.
    ///
    /// Lazily opens the global domain at first access. Panics if that
    /// open fails; a process that cannot reach its own preferences has no
    /// useful way to continue.
    pub fn shared() -> Arc<Prefs> {
        SHARED.read().clone()
    }

    /// Replace the shared store with a freshly opened one for `domain`.
    ///
    /// The swap is a plain assignment: code that already holds an `Arc`
    /// from [`Prefs::shared`] keeps operating against the previous domain
    /// until it re-fetches. That staleness is benign and deliberate; no
    /// further synchronization is provided.
    pub fn replace_shared(domain: Option<&str>) -> Result<()> {
        let next = Prefs::open(domain)?;
        debug!(?domain, "replacing shared store");
        *SHARED.write() = next;
        Ok(())
    }

    /// The domain this store is scoped to (`None` is the global domain).
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Store `value` under `key`.
    ///
    /// The value model makes non-persistable values unrepresentable, so
    /// the only failures are the collaborator's own (e.g. I/O), which are
    /// propagated verbatim.
    pub fn set<K: PrefKey + ?Sized>(&self, key: &K, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        debug!(domain = ?self.domain, key = key.key(), "set");
        self.persistence
            .raw_set(self.domain.as_deref(), key.key(), value)
    }

    /// The raw stored value for `key`, or `None` if never set or removed.
    pub fn object<K: PrefKey + ?Sized>(&self, key: &K) -> Option<Value> {
        self.persistence.raw_get(self.domain.as_deref(), key.key())
    }

    /// Integer reader: the stored integer, or `0` when the slot is absent
    /// or holds another type.
    ///
    /// The zero default mirrors the platform store's native numeric
    /// reader and is deliberately asymmetric with [`Prefs::object`],
    /// which reports absence as `None`.
    pub fn int<K: PrefKey + ?Sized>(&self, key: &K) -> i64 {
        self.object(key).and_then(|v| v.as_int()).unwrap_or(0)
    }

    /// Boolean reader: the stored boolean, or `false` when the slot is
    /// absent or holds another type.
    ///
    /// Same asymmetry as [`Prefs::int`].
    pub fn bool<K: PrefKey + ?Sized>(&self, key: &K) -> bool {
        self.object(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Delete the slot for `key`. Removing an absent key is a no-op.
    pub fn remove<K: PrefKey + ?Sized>(&self, key: &K) -> Result<()> {
        debug!(domain = ?self.domain, key = key.key(), "remove");
        self.persistence
            .raw_remove(self.domain.as_deref(), key.key())
    }

    /// Remove everything this store can see.
    ///
    /// On a suite-scoped store this deletes every key in that suite. On
    /// the global store it resets the entire global domain to
    /// factory-empty state. The two have very different blast radii.
    pub fn remove_all(&self) -> Result<()> {
        match self.domain.as_deref() {
            Some(name) => {
                warn!(suite = name, "removing every key in suite");
                self.persistence.raw_remove_domain(name)
            }
            None => {
                warn!("resetting the global domain");
                self.persistence.raw_reset_global()
            }
        }
    }
}
