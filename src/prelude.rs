//! Convenient imports for prefstore.
//!
//! Re-exports the commonly used types so you can get started with a
//! single import:
//!
//! ```ignore
//! use prefstore::prelude::*;
//!
//! let prefs = Prefs::open(Some("com.app.prefs"))?;
//! prefs.set("launchCount", 1)?;
//! ```

// Store and bindings
pub use crate::binding::{Pref, PrefValue};
pub use crate::store::Prefs;

// Error handling
pub use crate::error::{Error, Result};

// Keys and values
pub use crate::key::{Key, PrefKey};
pub use crate::value::Value;

// Persistence collaborators
pub use crate::platform::{FilePersistence, MemoryPersistence, Persistence};
