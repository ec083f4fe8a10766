//! Admin session: one hybrid store per collection behind one mode switch.
//!
//! # Responsibility
//! - Own local storage, the API client, seed sources and the mode switch.
//! - Build the explicit `StoreContext` for each store operation.
//! - Reload every store when the mode changes.
//!
//! # Invariants
//! - Exactly one store exists per `CollectionKind`.
//! - A mode change cancels the previous token before any reload starts.

use crate::api::RemoteApi;
use crate::cancel::CancelToken;
use crate::model::collection::{CollectionKind, CollectionValue};
use crate::model::item::ContentItem;
use crate::model::mode::DataMode;
use crate::repo::local_storage::{LocalStorage, StorageResult};
use crate::seed::SeedSource;
use crate::service::context::{SeedSources, StoreContext};
use crate::service::hybrid_store::{HybridStore, LoadState, OpOutcome, StoreResult};
use crate::service::mode_switch::ModeSwitch;
use serde_json::Value;

/// Summary of one store for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    pub kind: CollectionKind,
    pub state: LoadState,
    pub items: usize,
    pub error: Option<String>,
    pub source: Option<SeedSource>,
}

pub struct AdminSession<S, A> {
    storage: S,
    api: A,
    seeds: SeedSources,
    mode: ModeSwitch,
    stores: Vec<HybridStore>,
}

impl<S: LocalStorage, A: RemoteApi> AdminSession<S, A> {
    /// Creates a session with every store still in `Loading` state.
    pub fn new(storage: S, api: A, seeds: SeedSources) -> Self {
        let mode = ModeSwitch::load(&storage);
        let stores = CollectionKind::ALL.into_iter().map(HybridStore::new).collect();
        Self {
            storage,
            api,
            seeds,
            mode,
            stores,
        }
    }

    /// Creates a session and loads every collection.
    pub fn open(storage: S, api: A, seeds: SeedSources) -> Self {
        let mut session = Self::new(storage, api, seeds);
        session.load_all();
        session
    }

    pub fn mode(&self) -> DataMode {
        self.mode.mode()
    }

    pub fn mode_generation(&self) -> u64 {
        self.mode.generation()
    }

    /// Token governing work started under the current mode.
    pub fn token(&self) -> CancelToken {
        self.mode.token()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self, kind: CollectionKind) -> &HybridStore {
        &self.stores[slot(kind)]
    }

    pub fn value(&self, kind: CollectionKind) -> &CollectionValue {
        self.store(kind).value()
    }

    /// Switches mode and reloads every store; no-op when unchanged.
    ///
    /// Returns whether a switch happened. When the flag cannot be persisted
    /// the mode, token and stores are left as they were.
    pub fn set_mode(&mut self, mode: DataMode) -> StorageResult<bool> {
        let changed = self.mode.set(&self.storage, mode)?;
        if changed {
            self.load_all();
        }
        Ok(changed)
    }

    pub fn toggle_mode(&mut self) -> StorageResult<DataMode> {
        let next = self.mode().toggled();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Reloads every store under the current mode.
    pub fn load_all(&mut self) -> Vec<(CollectionKind, OpOutcome)> {
        CollectionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.load(kind)))
            .collect()
    }

    pub fn load(&mut self, kind: CollectionKind) -> OpOutcome {
        self.with_store(kind, |store, ctx| store.load(ctx))
    }

    pub fn create(&mut self, kind: CollectionKind, record: ContentItem) -> StoreResult<OpOutcome> {
        self.with_store(kind, |store, ctx| store.create(ctx, record))
    }

    pub fn update(&mut self, kind: CollectionKind, record: ContentItem) -> StoreResult<OpOutcome> {
        self.with_store(kind, |store, ctx| store.update(ctx, record))
    }

    pub fn remove(&mut self, kind: CollectionKind, id: &str) -> StoreResult<OpOutcome> {
        self.with_store(kind, |store, ctx| store.remove(ctx, id))
    }

    /// Creates the record if its id is unknown, updates it otherwise.
    pub fn save(&mut self, kind: CollectionKind, record: ContentItem) -> StoreResult<OpOutcome> {
        let exists = record
            .id()
            .is_some_and(|id| self.store(kind).value().find(&id).is_some());
        if exists || kind == CollectionKind::Settings {
            self.update(kind, record)
        } else {
            self.create(kind, record)
        }
    }

    /// Replaces a collection locally (import); no remote call.
    pub fn replace(&mut self, kind: CollectionKind, raw: Value) {
        self.with_store(kind, |store, ctx| store.replace(ctx.storage, raw))
    }

    pub fn statuses(&self) -> Vec<StoreStatus> {
        self.stores
            .iter()
            .map(|store| StoreStatus {
                kind: store.kind(),
                state: store.state(),
                items: store.value().len(),
                error: store.error().map(str::to_string),
                source: store.source().cloned(),
            })
            .collect()
    }

    fn with_store<R>(
        &mut self,
        kind: CollectionKind,
        op: impl FnOnce(&mut HybridStore, &StoreContext<'_>) -> R,
    ) -> R {
        let ctx = StoreContext::new(
            &self.storage,
            &self.api,
            self.mode.mode(),
            self.mode.token(),
            &self.seeds,
        );
        op(&mut self.stores[slot(kind)], &ctx)
    }
}

fn slot(kind: CollectionKind) -> usize {
    CollectionKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or_default()
}
