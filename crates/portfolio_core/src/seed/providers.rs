//! Concrete seed providers, one per data source.

use super::resolver::{SeedMiss, SeedProvider, SeedSource};
use crate::api::RemoteApi;
use crate::model::collection::{CollectionKind, CollectionValue};
use crate::repo::local_storage::LocalStorage;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const BUILTIN_MOCK_JSON: &str = include_str!("mock.json");

/// Persisted snapshot under `portfolio_{collection}`.
///
/// A parsable snapshot of the wrong shape (including `null`) resolves to the
/// default instead of falling through, so stale local state never reaches the
/// network sources. Only unreadable or malformed snapshots are misses.
pub struct LocalStorageSeed<S> {
    storage: S,
}

impl<S: LocalStorage> LocalStorageSeed<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: LocalStorage> SeedProvider for LocalStorageSeed<S> {
    fn source(&self) -> SeedSource {
        SeedSource::LocalStorage
    }

    fn provide(&self, kind: CollectionKind, default: &CollectionValue) -> Result<Value, SeedMiss> {
        let stored = self
            .storage
            .get_item(&kind.storage_key())
            .map_err(|err| SeedMiss::new(format!("read failed: {err}")))?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| SeedMiss::new("no snapshot"))?;

        let parsed: Value = serde_json::from_str(&stored)
            .map_err(|err| SeedMiss::new(format!("malformed snapshot: {err}")))?;
        if default.is_compatible(&parsed) {
            Ok(parsed)
        } else {
            Ok(default.to_json())
        }
    }
}

/// Read-only `GET /public/{collection}`.
pub struct PublicApiSeed<A> {
    api: A,
}

impl<A: RemoteApi> PublicApiSeed<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi> SeedProvider for PublicApiSeed<A> {
    fn source(&self) -> SeedSource {
        SeedSource::PublicApi
    }

    fn provide(&self, kind: CollectionKind, _default: &CollectionValue) -> Result<Value, SeedMiss> {
        match self.api.fetch_public(kind.key()) {
            Ok(Value::Null) => Err(SeedMiss::new("empty response")),
            Ok(value) => Ok(value),
            Err(err) => Err(SeedMiss::new(err.to_string())),
        }
    }
}

/// Named data module shipped with (or next to) the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct BundledSeed {
    name: String,
    data: Map<String, Value>,
}

impl BundledSeed {
    pub fn new(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Parses a module from JSON text; the top level must be an object.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, SeedMiss> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(data)) => Ok(Self::new(name, data)),
            Ok(_) => Err(SeedMiss::new("bundle is not a JSON object")),
            Err(err) => Err(SeedMiss::new(format!("malformed bundle: {err}"))),
        }
    }

    /// Loads a module from a JSON file.
    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self, SeedMiss> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| SeedMiss::new(format!("cannot read `{}`: {err}", path.display())))?;
        Self::parse(name, &text)
    }

    /// The `mock` module compiled into the crate.
    pub fn builtin_mock() -> Self {
        Self::parse("mock", BUILTIN_MOCK_JSON)
            .unwrap_or_else(|_| Self::new("mock", Map::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SeedProvider for BundledSeed {
    fn source(&self) -> SeedSource {
        SeedSource::Bundled(self.name.clone())
    }

    fn provide(&self, kind: CollectionKind, _default: &CollectionValue) -> Result<Value, SeedMiss> {
        match self.data.get(kind.key()) {
            Some(Value::Null) | None => Err(SeedMiss::new("no entry for collection")),
            Some(value) => Ok(value.clone()),
        }
    }
}

impl SeedProvider for &BundledSeed {
    fn source(&self) -> SeedSource {
        (**self).source()
    }

    fn provide(&self, kind: CollectionKind, default: &CollectionValue) -> Result<Value, SeedMiss> {
        (**self).provide(kind, default)
    }
}

/// Static `{dir}/{collection}.json` resource.
pub struct StaticFileSeed {
    dir: Option<PathBuf>,
}

impl StaticFileSeed {
    /// `None` disables the provider (every lookup misses).
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, kind: CollectionKind) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", kind.key())))
    }
}

impl SeedProvider for StaticFileSeed {
    fn source(&self) -> SeedSource {
        SeedSource::StaticFile
    }

    fn provide(&self, kind: CollectionKind, _default: &CollectionValue) -> Result<Value, SeedMiss> {
        let path = self
            .path_for(kind)
            .ok_or_else(|| SeedMiss::new("no static directory configured"))?;
        let text = std::fs::read_to_string(&path)
            .map_err(|err| SeedMiss::new(format!("cannot read `{}`: {err}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|err| SeedMiss::new(format!("malformed `{}`: {err}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::{BundledSeed, StaticFileSeed};
    use crate::model::collection::CollectionKind;
    use crate::seed::resolver::SeedProvider;

    #[test]
    fn builtin_mock_has_projects_but_not_posts() {
        let mock = BundledSeed::builtin_mock();
        let default = CollectionKind::Projects.default_value();
        let projects = mock.provide(CollectionKind::Projects, &default).unwrap();
        assert_eq!(projects.as_array().map(Vec::len), Some(2));
        assert!(mock.provide(CollectionKind::Posts, &default).is_err());
    }

    #[test]
    fn parse_rejects_non_object_bundle() {
        assert!(BundledSeed::parse("seed", "[1, 2]").is_err());
        assert!(BundledSeed::parse("seed", "{oops").is_err());
    }

    #[test]
    fn static_file_without_directory_misses() {
        let provider = StaticFileSeed::new(None);
        let default = CollectionKind::Skills.default_value();
        assert!(provider.path_for(CollectionKind::Skills).is_none());
        assert!(provider.provide(CollectionKind::Skills, &default).is_err());
    }
}
