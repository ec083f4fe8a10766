//! Ordered provider chain with first-success composition.

use crate::model::collection::{CollectionKind, CollectionValue};
use log::{debug, info};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Where a seed value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    LocalStorage,
    PublicApi,
    /// Bundled data module, by name (`seed`, `mock`).
    Bundled(String),
    StaticFile,
    Default,
}

impl Display for SeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalStorage => f.write_str("local_storage"),
            Self::PublicApi => f.write_str("public_api"),
            Self::Bundled(name) => write!(f, "bundled:{name}"),
            Self::StaticFile => f.write_str("static_file"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// A provider had nothing usable for the requested collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMiss {
    pub reason: String,
}

impl SeedMiss {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One data source in the seed chain.
pub trait SeedProvider {
    fn source(&self) -> SeedSource;

    /// Returns raw JSON for `kind`, or a miss.
    ///
    /// `default` is passed so providers can apply shape-specific rules.
    fn provide(&self, kind: CollectionKind, default: &CollectionValue) -> Result<Value, SeedMiss>;
}

/// Resolved seed value and its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub value: CollectionValue,
    pub source: SeedSource,
}

/// Tries providers in order and keeps the first shape-compatible answer.
///
/// Answers whose shape does not match `default` count as misses.
pub fn first_success(
    providers: &[Box<dyn SeedProvider + '_>],
    kind: CollectionKind,
    default: &CollectionValue,
) -> Option<(SeedSource, Value)> {
    for provider in providers {
        let source = provider.source();
        match provider.provide(kind, default) {
            Ok(raw) if default.is_compatible(&raw) => return Some((source, raw)),
            Ok(_) => debug!(
                "event=seed_miss module=seed collection={} source={} reason=incompatible_shape",
                kind, source
            ),
            Err(miss) => debug!(
                "event=seed_miss module=seed collection={} source={} reason={}",
                kind, source, miss.reason
            ),
        }
    }
    None
}

/// Ordered list of seed providers.
#[derive(Default)]
pub struct SeedResolver<'a> {
    providers: Vec<Box<dyn SeedProvider + 'a>>,
}

impl<'a> SeedResolver<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider after the existing ones.
    pub fn with(mut self, provider: impl SeedProvider + 'a) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn sources(&self) -> Vec<SeedSource> {
        self.providers.iter().map(|provider| provider.source()).collect()
    }

    /// Resolves the seed for `kind`, falling back to `default`.
    pub fn resolve(&self, kind: CollectionKind, default: &CollectionValue) -> Seed {
        let seed = match first_success(&self.providers, kind, default) {
            Some((source, raw)) => Seed {
                value: default.conform(raw),
                source,
            },
            None => Seed {
                value: default.clone(),
                source: SeedSource::Default,
            },
        };
        info!(
            "event=seed_resolve module=seed status=ok collection={} source={} items={}",
            kind,
            seed.source,
            seed.value.len()
        );
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::{SeedMiss, SeedProvider, SeedResolver, SeedSource};
    use crate::model::collection::{CollectionKind, CollectionValue};
    use serde_json::{json, Value};
    use std::cell::Cell;

    struct Fixed {
        source: SeedSource,
        answer: Result<Value, SeedMiss>,
        calls: Cell<u32>,
    }

    impl Fixed {
        fn new(source: SeedSource, answer: Result<Value, SeedMiss>) -> Self {
            Self {
                source,
                answer,
                calls: Cell::new(0),
            }
        }
    }

    impl SeedProvider for &Fixed {
        fn source(&self) -> SeedSource {
            self.source.clone()
        }

        fn provide(&self, _: CollectionKind, _: &CollectionValue) -> Result<Value, SeedMiss> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone()
        }
    }

    #[test]
    fn first_success_wins_and_later_providers_are_not_called() {
        let miss = Fixed::new(SeedSource::LocalStorage, Err(SeedMiss::new("empty")));
        let hit = Fixed::new(SeedSource::PublicApi, Ok(json!([{"id": "a"}])));
        let later = Fixed::new(SeedSource::StaticFile, Ok(json!([{"id": "b"}])));

        let seed = SeedResolver::new()
            .with(&miss)
            .with(&hit)
            .with(&later)
            .resolve(CollectionKind::Projects, &CollectionValue::List(vec![]));

        assert_eq!(seed.source, SeedSource::PublicApi);
        assert_eq!(seed.value.ids(), vec!["a".to_string()]);
        assert_eq!(miss.calls.get(), 1);
        assert_eq!(hit.calls.get(), 1);
        assert_eq!(later.calls.get(), 0);
    }

    #[test]
    fn incompatible_shape_is_skipped() {
        let wrong = Fixed::new(SeedSource::Bundled("mock".into()), Ok(json!({"soft": []})));
        let seed = SeedResolver::new()
            .with(&wrong)
            .resolve(CollectionKind::Skills, &CollectionValue::List(vec![]));
        assert_eq!(seed.source, SeedSource::Default);
        assert_eq!(wrong.calls.get(), 1);
    }

    #[test]
    fn empty_chain_returns_default() {
        let default = CollectionKind::Settings.default_value();
        let seed = SeedResolver::new().resolve(CollectionKind::Settings, &default);
        assert_eq!(seed.source, SeedSource::Default);
        assert_eq!(seed.value, default);
    }
}
