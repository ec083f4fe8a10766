//! Content model shared by stores, seed providers and the API client.
//!
//! # Responsibility
//! - Define the JSON-backed content item and collection shapes.
//! - Name every admin collection and its built-in defaults.
//!
//! # Invariants
//! - Items carry an `id` after normalization whenever `id` or `_id` exists.
//! - List collections keep insertion order as display order.

pub mod collection;
pub mod item;
pub mod mode;
