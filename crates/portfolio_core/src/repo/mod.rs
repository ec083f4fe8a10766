//! Local persistence behind the browser-style key/value contract.
//!
//! # Responsibility
//! - Define the `LocalStorage` contract used by stores and seed providers.
//! - Keep SQLite details inside the persistence boundary.
//!
//! # Invariants
//! - Values are opaque strings; JSON encoding happens in callers.
//! - `set_item` replaces any previous value under the same key.

pub mod local_storage;
