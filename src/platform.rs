//! Persistence collaborators.
//!
//! The store does not implement its own storage engine. It delegates to a
//! [`Persistence`] collaborator that owns the raw per-domain key-value
//! surface, the way a platform defaults store sits behind its preferences
//! API. Two collaborators ship:
//!
//! - [`MemoryPersistence`]: process-local maps, the default. Nothing
//!   survives the process; useful for tests and ephemeral tools.
//! - [`FilePersistence`]: one JSON file per domain under a base directory,
//!   with an in-memory cache flushed to disk on every mutation.
//!
//! A process has one ambient collaborator, installed via [`install`] before
//! first use (or defaulting to memory). All stores opened through
//! [`Prefs::open`](crate::Prefs::open) share it, which is what makes two
//! stores on the same domain observe each other's writes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::value::Value;

/// Keys of one domain, as stored.
type DomainMap = HashMap<String, Value>;

/// All domains held by a collaborator. `None` is the global domain.
type Domains = HashMap<Option<String>, DomainMap>;

/// Raw persistence surface behind the store.
///
/// Domains are addressed as `Option<&str>`: `None` is the global/default
/// domain, `Some(name)` a named suite. Implementations must be internally
/// synchronized; the wrapper above adds no locking of its own.
///
/// Callers open a domain before reading it: an unopened domain reads as
/// empty. [`Prefs::open`](crate::Prefs::open) does this for every store it
/// constructs.
pub trait Persistence: Send + Sync + 'static {
    /// Open (or create) the backing store for `domain`.
    ///
    /// This is the startup-failure path: an unreadable or corrupt backing
    /// store surfaces here as [`Error::OpenFailed`], and nowhere else.
    fn open_domain(&self, domain: Option<&str>) -> Result<()>;

    /// The raw stored value for `key`, or `None` if never set or removed.
    fn raw_get(&self, domain: Option<&str>, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    fn raw_set(&self, domain: Option<&str>, key: &str, value: Value) -> Result<()>;

    /// Delete the slot for `key`. Removing an absent key is a no-op.
    fn raw_remove(&self, domain: Option<&str>, key: &str) -> Result<()>;

    /// Delete every key in the named suite.
    fn raw_remove_domain(&self, name: &str) -> Result<()>;

    /// Reset the global domain to factory-empty state.
    fn raw_reset_global(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryPersistence
// ---------------------------------------------------------------------------

/// Process-local, non-persistent collaborator.
///
/// The default when nothing is [`install`]ed. All domains live in one map
/// behind a `RwLock`; data is gone when the process exits.
#[derive(Default)]
pub struct MemoryPersistence {
    domains: RwLock<Domains>,
}

impl MemoryPersistence {
    /// Create an empty in-memory collaborator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryPersistence {
    fn open_domain(&self, domain: Option<&str>) -> Result<()> {
        self.domains
            .write()
            .entry(domain.map(str::to_owned))
            .or_default();
        Ok(())
    }

    fn raw_get(&self, domain: Option<&str>, key: &str) -> Option<Value> {
        self.domains
            .read()
            .get(&domain.map(str::to_owned))
            .and_then(|map| map.get(key).cloned())
    }

    fn raw_set(&self, domain: Option<&str>, key: &str, value: Value) -> Result<()> {
        self.domains
            .write()
            .entry(domain.map(str::to_owned))
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn raw_remove(&self, domain: Option<&str>, key: &str) -> Result<()> {
        if let Some(map) = self.domains.write().get_mut(&domain.map(str::to_owned)) {
            map.remove(key);
        }
        Ok(())
    }

    fn raw_remove_domain(&self, name: &str) -> Result<()> {
        self.domains.write().remove(&Some(name.to_string()));
        Ok(())
    }

    fn raw_reset_global(&self) -> Result<()> {
        self.domains.write().remove(&None);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FilePersistence
// ---------------------------------------------------------------------------

/// File-backed collaborator: one JSON file per domain.
///
/// Layout under the base directory:
///
/// ```text
/// <base>/defaults.json        global domain
/// <base>/suites/<name>.json   named suites
/// ```
///
/// Each domain is cached in memory and flushed to its file on every
/// mutation. A missing file is an empty domain; an unreadable or malformed
/// file is a startup error when the domain is opened.
pub struct FilePersistence {
    base: PathBuf,
    domains: RwLock<Domains>,
}

impl FilePersistence {
    /// Open a file-backed collaborator rooted at `base`.
    ///
    /// Creates the directory layout if it does not exist.
    pub fn open(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(base.join("suites"))?;
        Ok(Self {
            base,
            domains: RwLock::new(Domains::new()),
        })
    }

    fn domain_path(&self, domain: Option<&str>) -> PathBuf {
        match domain {
            Some(name) => self.base.join("suites").join(format!("{name}.json")),
            None => self.base.join("defaults.json"),
        }
    }

    /// Flush one domain's map to its file. Callers hold the write lock.
    fn flush(&self, domain: Option<&str>, map: &DomainMap) -> Result<()> {
        let path = self.domain_path(domain);
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), keys = map.len(), "flushed domain");
        Ok(())
    }

    /// Delete a domain file, treating an absent file as already deleted.
    fn delete_file(&self, domain: Option<&str>) -> Result<()> {
        let path = self.domain_path(domain);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Persistence for FilePersistence {
    fn open_domain(&self, domain: Option<&str>) -> Result<()> {
        // Suite names become file names; reject ones that would escape the
        // suites directory.
        if let Some(name) = domain {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(Error::OpenFailed {
                    domain: Some(name.to_string()),
                    reason: "invalid suite name".to_string(),
                });
            }
        }

        let mut domains = self.domains.write();
        if domains.contains_key(&domain.map(str::to_owned)) {
            return Ok(());
        }

        let path = self.domain_path(domain);
        let map = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str::<DomainMap>(&content).map_err(|e| Error::OpenFailed {
                    domain: domain.map(str::to_owned),
                    reason: format!("malformed domain file {}: {e}", path.display()),
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => DomainMap::new(),
            Err(e) => {
                return Err(Error::OpenFailed {
                    domain: domain.map(str::to_owned),
                    reason: format!("cannot read {}: {e}", path.display()),
                })
            }
        };

        debug!(?domain, keys = map.len(), "opened domain");
        domains.insert(domain.map(str::to_owned), map);
        Ok(())
    }

    fn raw_get(&self, domain: Option<&str>, key: &str) -> Option<Value> {
        self.domains
            .read()
            .get(&domain.map(str::to_owned))
            .and_then(|map| map.get(key).cloned())
    }

    fn raw_set(&self, domain: Option<&str>, key: &str, value: Value) -> Result<()> {
        let mut domains = self.domains.write();
        let map = domains.entry(domain.map(str::to_owned)).or_default();
        map.insert(key.to_string(), value);
        self.flush(domain, map)
    }

    fn raw_remove(&self, domain: Option<&str>, key: &str) -> Result<()> {
        let mut domains = self.domains.write();
        if let Some(map) = domains.get_mut(&domain.map(str::to_owned)) {
            if map.remove(key).is_some() {
                return self.flush(domain, map);
            }
        }
        Ok(())
    }

    fn raw_remove_domain(&self, name: &str) -> Result<()> {
        self.domains.write().remove(&Some(name.to_string()));
        warn!(suite = name, "removed suite domain");
        self.delete_file(Some(name))
    }

    fn raw_reset_global(&self) -> Result<()> {
        self.domains.write().remove(&None);
        warn!("reset global domain");
        self.delete_file(None)
    }
}

// ---------------------------------------------------------------------------
// Process-wide collaborator
// ---------------------------------------------------------------------------

static PLATFORM: OnceCell<Arc<dyn Persistence>> = OnceCell::new();

/// Install the process-wide persistence collaborator.
///
/// Must run before the first store is opened; once any store has used the
/// ambient collaborator (including the lazy in-memory default), installing
/// another returns [`Error::AlreadyInstalled`].
///
/// ```ignore
/// let files = FilePersistence::open("/var/lib/myapp/prefs")?;
/// prefstore::platform::install(Arc::new(files))?;
/// ```
pub fn install(persistence: Arc<dyn Persistence>) -> Result<()> {
    PLATFORM
        .set(persistence)
        .map_err(|_| Error::AlreadyInstalled)
}

/// The ambient collaborator, defaulting to in-memory on first use.
pub(crate) fn collaborator() -> Arc<dyn Persistence> {
    PLATFORM
        .get_or_init(|| Arc::new(MemoryPersistence::new()) as Arc<dyn Persistence>)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_domains_are_isolated() {
        let p = MemoryPersistence::new();
        p.open_domain(None).unwrap();
        p.open_domain(Some("suite")).unwrap();

        p.raw_set(None, "k", Value::Int(1)).unwrap();
        p.raw_set(Some("suite"), "k", Value::Int(2)).unwrap();

        assert_eq!(p.raw_get(None, "k"), Some(Value::Int(1)));
        assert_eq!(p.raw_get(Some("suite"), "k"), Some(Value::Int(2)));

        p.raw_remove_domain("suite").unwrap();
        assert_eq!(p.raw_get(Some("suite"), "k"), None);
        assert_eq!(p.raw_get(None, "k"), Some(Value::Int(1)));
    }

    #[test]
    fn file_persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let p = FilePersistence::open(dir.path()).unwrap();
            p.open_domain(Some("app")).unwrap();
            p.raw_set(Some("app"), "theme", Value::String("dark".into()))
                .unwrap();
        }

        let p = FilePersistence::open(dir.path()).unwrap();
        p.open_domain(Some("app")).unwrap();
        assert_eq!(
            p.raw_get(Some("app"), "theme"),
            Some(Value::String("dark".into()))
        );
    }

    #[test]
    fn malformed_domain_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let p = FilePersistence::open(dir.path()).unwrap();
        fs::write(dir.path().join("suites/bad.json"), "{not json").unwrap();

        let err = p.open_domain(Some("bad")).unwrap_err();
        assert!(err.is_startup());
    }

    #[test]
    fn invalid_suite_name_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let p = FilePersistence::open(dir.path()).unwrap();
        assert!(p.open_domain(Some("../escape")).unwrap_err().is_startup());
        assert!(p.open_domain(Some("")).unwrap_err().is_startup());
    }

    #[test]
    fn reset_global_leaves_suites_alone() {
        let dir = tempfile::tempdir().unwrap();
        let p = FilePersistence::open(dir.path()).unwrap();
        p.open_domain(None).unwrap();
        p.open_domain(Some("app")).unwrap();

        p.raw_set(None, "k", Value::Bool(true)).unwrap();
        p.raw_set(Some("app"), "k", Value::Bool(false)).unwrap();

        p.raw_reset_global().unwrap();
        assert_eq!(p.raw_get(None, "k"), None);
        assert_eq!(p.raw_get(Some("app"), "k"), Some(Value::Bool(false)));
    }
}
