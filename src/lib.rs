//! # Prefstore
//!
//! Typed, domain-scoped bindings over a key-value preferences store.
//!
//! Prefstore wraps a platform-style persistence layer (property-list
//! shaped values indexed by string keys) with two small pieces:
//!
//! - [`Prefs`], a store service scoped to one domain ("suite"), with a
//!   process-wide shared instance;
//! - [`Pref`], a declarative typed accessor binding a key, a default
//!   value, and a captured store into a `get()`/`set()` pair.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prefstore::prelude::*;
//!
//! // Store service, scoped to a suite
//! let prefs = Prefs::open(Some("com.app.prefs"))?;
//! prefs.set("launchCount", 5)?;
//! assert_eq!(prefs.int("launchCount"), 5);
//!
//! // Declarative typed binding against the shared store
//! let theme: Pref<String> = Pref::new("theme", "light".to_string());
//! theme.set("dark".to_string())?;
//! assert_eq!(theme.get(), "dark");
//! ```
//!
//! ## Semantics in one paragraph
//!
//! Reads substitute the binding's default when a slot is absent or holds a
//! value of the wrong type; that is never an error. Writing the absent
//! variant of an optional type removes the slot instead of storing a null
//! marker. `int`/`bool` readers on the store return `0`/`false` for absent
//! slots while `object` returns `None`; that is the platform store's
//! native asymmetry, preserved on purpose. Removing an absent key is a
//! no-op.
//! `remove_all` deletes a whole suite, or resets the global domain when
//! the store is global: two very different blast radii.
//!
//! ## Concurrency
//!
//! Every operation is a synchronous call into the persistence
//! collaborator, which is internally synchronized; the wrapper adds no
//! guarantees of its own. Replacing the shared store while other code
//! holds the previous instance is allowed: stale holders keep operating
//! against the old domain until they re-fetch.

#![warn(missing_docs)]

mod binding;
mod error;
mod key;
mod store;
mod value;

pub mod platform;
pub mod prelude;

// Re-export main entry points
pub use binding::{Pref, PrefValue};
pub use error::{Error, Result};
pub use key::{Key, PrefKey};
pub use platform::{FilePersistence, MemoryPersistence, Persistence};
pub use store::Prefs;
pub use value::Value;
