//! Seed resolution: the initial value of a collection.
//!
//! # Responsibility
//! - Provide one seed provider per data source.
//! - Compose providers with a single "first success wins" rule.
//!
//! # Invariants
//! - Each provider is asked at most once per resolution.
//! - Provider misses are logged, never surfaced to callers.
//! - A resolution always yields a value (the default as last resort).

pub mod providers;
pub mod resolver;

pub use providers::{BundledSeed, LocalStorageSeed, PublicApiSeed, StaticFileSeed};
pub use resolver::{Seed, SeedMiss, SeedProvider, SeedResolver, SeedSource};
