//! Explicit inputs shared by every store operation.
//!
//! Stores hold no references to storage, API or mode; each call receives a
//! `StoreContext`, so behavior depends only on (context, arguments, state).

use crate::api::RemoteApi;
use crate::cancel::CancelToken;
use crate::config::PortfolioConfig;
use crate::model::mode::DataMode;
use crate::repo::local_storage::LocalStorage;
use crate::seed::{BundledSeed, LocalStorageSeed, PublicApiSeed, SeedResolver, StaticFileSeed};
use log::warn;
use std::path::PathBuf;

/// Seed sources beyond local storage and the public API.
#[derive(Debug, Clone, Default)]
pub struct SeedSources {
    /// Bundled modules, tried in order (`seed` before `mock`).
    pub bundles: Vec<BundledSeed>,
    pub static_dir: Option<PathBuf>,
}

impl SeedSources {
    /// Only the compiled-in `mock` module.
    pub fn builtin() -> Self {
        Self {
            bundles: vec![BundledSeed::builtin_mock()],
            static_dir: None,
        }
    }

    /// Optional `seed` file from config, the bundled `mock` module, and the
    /// configured static directory. An unreadable seed file is skipped.
    pub fn from_config(config: &PortfolioConfig) -> Self {
        let mut bundles = Vec::new();
        if let Some(path) = &config.seed_file {
            match BundledSeed::from_file("seed", path) {
                Ok(bundle) => bundles.push(bundle),
                Err(miss) => warn!(
                    "event=seed_bundle module=seed status=skipped path={} reason={}",
                    path.display(),
                    miss.reason
                ),
            }
        }
        bundles.push(BundledSeed::builtin_mock());
        Self {
            bundles,
            static_dir: config.static_dir.clone(),
        }
    }

    /// Builds the full chain: local storage, public API, bundles, static file.
    pub fn resolver<'a>(
        &'a self,
        storage: &'a dyn LocalStorage,
        api: &'a dyn RemoteApi,
    ) -> SeedResolver<'a> {
        let resolver = SeedResolver::new()
            .with(LocalStorageSeed::new(storage))
            .with(PublicApiSeed::new(api));
        self.bundles
            .iter()
            .fold(resolver, |resolver, bundle| resolver.with(bundle))
            .with(StaticFileSeed::new(self.static_dir.clone()))
    }
}

/// Everything a store operation may touch besides its own state.
pub struct StoreContext<'a> {
    pub storage: &'a dyn LocalStorage,
    pub api: &'a dyn RemoteApi,
    pub mode: DataMode,
    pub token: CancelToken,
    pub seeds: &'a SeedSources,
}

impl<'a> StoreContext<'a> {
    pub fn new(
        storage: &'a dyn LocalStorage,
        api: &'a dyn RemoteApi,
        mode: DataMode,
        token: CancelToken,
        seeds: &'a SeedSources,
    ) -> Self {
        Self {
            storage,
            api,
            mode,
            token,
            seeds,
        }
    }

    pub fn seed_resolver(&self) -> SeedResolver<'a> {
        self.seeds.resolver(self.storage, self.api)
    }
}
