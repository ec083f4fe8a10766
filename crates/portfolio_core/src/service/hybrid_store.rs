//! Per-collection hybrid store with optimistic local mutation.
//!
//! # Responsibility
//! - Hold the in-memory value of one collection.
//! - Apply create/update/remove locally first, then (live mode) remotely.
//! - Persist every state change to local storage.
//!
//! # Invariants
//! - Create and update never roll back; a remote failure keeps the local edit
//!   and sets an advisory error.
//! - Remove restores the exact pre-removal value when the remote delete fails.
//! - A result arriving after the context token was cancelled is discarded.
//! - Persistence failures are logged and never fail an operation.

use crate::model::collection::{normalize_list, CollectionKind, CollectionValue};
use crate::model::item::ContentItem;
use crate::repo::local_storage::LocalStorage;
use crate::seed::SeedSource;
use crate::service::context::StoreContext;
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CREATE_FAILED: &str = "Create failed. Working locally.";
pub const UPDATE_FAILED: &str = "Update failed. Working locally.";
pub const DELETE_FAILED: &str = "Delete failed. Working locally.";

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected store operation; nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    MissingId(CollectionKind),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId(kind) => write!(f, "{kind} record has no `id` or `_id`"),
        }
    }
}

impl Error for StoreError {}

/// Lifecycle of the in-memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// How an operation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// Applied locally and, in live mode, confirmed remotely.
    Applied,
    /// Applied locally only; the remote call failed.
    AppliedLocally { error: String },
    /// Remote call failed and the local change was undone.
    RolledBack { error: String },
    /// Token was cancelled while the remote call was in flight.
    Cancelled,
}

impl OpOutcome {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::AppliedLocally { error } | Self::RolledBack { error } => Some(error),
            Self::Applied | Self::Cancelled => None,
        }
    }
}

/// In-memory state of one collection.
#[derive(Debug, Clone)]
pub struct HybridStore {
    kind: CollectionKind,
    default: CollectionValue,
    value: CollectionValue,
    state: LoadState,
    error: Option<String>,
    source: Option<SeedSource>,
}

impl HybridStore {
    /// Creates a store holding the built-in default, not yet loaded.
    pub fn new(kind: CollectionKind) -> Self {
        Self::with_default(kind, kind.default_value())
    }

    pub fn with_default(kind: CollectionKind, default: CollectionValue) -> Self {
        Self {
            kind,
            value: default.clone(),
            default,
            state: LoadState::Loading,
            error: None,
            source: None,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn value(&self) -> &CollectionValue {
        &self.value
    }

    pub fn items(&self) -> &[ContentItem] {
        self.value.items()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Advisory message from the last operation, if it degraded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Seed source of the last local load; `None` after a live load.
    pub fn source(&self) -> Option<&SeedSource> {
        self.source.as_ref()
    }

    /// Discards in-memory state and reloads it for the context mode.
    ///
    /// Live mode reads `GET /admin/{collection}` and falls back to the seed
    /// chain on failure; mock mode reads the seed chain directly.
    pub fn load(&mut self, ctx: &StoreContext<'_>) -> OpOutcome {
        self.state = LoadState::Loading;
        self.error = None;
        info!(
            "event=store_load module=store status=start collection={} mode={}",
            self.kind, ctx.mode
        );

        let (value, source, error) = if ctx.mode.is_live() {
            match ctx.api.fetch_admin(self.kind) {
                Ok(raw) => (self.conform_admin_response(raw), None, None),
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=fallback collection={} error={}",
                        self.kind, err
                    );
                    let seed = ctx.seed_resolver().resolve(self.kind, &self.default);
                    let message = format!(
                        "Could not reach /api/admin/{}; using local data.",
                        self.kind.key()
                    );
                    (seed.value, Some(seed.source), Some(message))
                }
            }
        } else {
            let seed = ctx.seed_resolver().resolve(self.kind, &self.default);
            (seed.value, Some(seed.source), None)
        };

        if ctx.token.is_cancelled() {
            debug!(
                "event=store_load module=store status=cancelled collection={}",
                self.kind
            );
            return OpOutcome::Cancelled;
        }

        self.source = source;
        self.error = error.clone();
        self.state = LoadState::Ready;
        self.set_value(ctx.storage, value);
        info!(
            "event=store_load module=store status=ok collection={} items={}",
            self.kind,
            self.value.len()
        );

        match error {
            Some(error) => OpOutcome::AppliedLocally { error },
            None => OpOutcome::Applied,
        }
    }

    /// Prepends `record` (singleton: replaces it), then creates it remotely.
    ///
    /// On remote success the optimistic record is replaced by the server's.
    /// On failure the optimistic record stays and the error is set.
    pub fn create(
        &mut self,
        ctx: &StoreContext<'_>,
        record: ContentItem,
    ) -> StoreResult<OpOutcome> {
        self.error = None;
        let record = record.normalized();
        let optimistic_id = record.id();

        let mut next = self.value.clone();
        match &mut next {
            CollectionValue::List(items) => items.insert(0, record.clone()),
            CollectionValue::Record(current) => *current = record.clone(),
        }
        self.set_value(ctx.storage, next);

        if !ctx.mode.is_live() {
            return Ok(OpOutcome::Applied);
        }

        let result = ctx.api.create(self.kind, &record.clone().into_value());
        if ctx.token.is_cancelled() {
            return Ok(OpOutcome::Cancelled);
        }

        match result {
            Ok(raw) => {
                let Some(saved) = ContentItem::from_value(raw).map(ContentItem::normalized) else {
                    warn!(
                        "event=store_create module=store status=partial collection={} reason={}",
                        self.kind, "non_object_response"
                    );
                    return Ok(OpOutcome::Applied);
                };
                let mut next = self.value.clone();
                match &mut next {
                    CollectionValue::List(items) => {
                        match &optimistic_id {
                            Some(id) => items.retain(|item| !item.has_id(id)),
                            None => {
                                if let Some(pos) = items.iter().position(|item| *item == record) {
                                    items.remove(pos);
                                }
                            }
                        }
                        items.insert(0, saved);
                    }
                    CollectionValue::Record(current) => *current = saved,
                }
                self.set_value(ctx.storage, next);
                Ok(OpOutcome::Applied)
            }
            Err(err) => Ok(self.degrade("create", &err.to_string(), CREATE_FAILED, false)),
        }
    }

    /// Replaces the item with the same id in place, or prepends it.
    ///
    /// Singleton collections replace the record and `PUT` without an id.
    pub fn update(
        &mut self,
        ctx: &StoreContext<'_>,
        record: ContentItem,
    ) -> StoreResult<OpOutcome> {
        let record = record.normalized();
        let id = record.id();

        let mut next = self.value.clone();
        match &mut next {
            CollectionValue::List(items) => {
                let id = id.as_deref().ok_or(StoreError::MissingId(self.kind))?;
                match items.iter().position(|item| item.has_id(id)) {
                    Some(pos) => items[pos] = record.clone(),
                    None => items.insert(0, record.clone()),
                }
            }
            CollectionValue::Record(current) => *current = record.clone(),
        }
        self.error = None;
        self.set_value(ctx.storage, next);

        if !ctx.mode.is_live() {
            return Ok(OpOutcome::Applied);
        }

        let remote_id = match self.value {
            CollectionValue::List(_) => id.as_deref(),
            CollectionValue::Record(_) => None,
        };
        let result = ctx.api.update(self.kind, remote_id, &record.into_value());
        if ctx.token.is_cancelled() {
            return Ok(OpOutcome::Cancelled);
        }

        match result {
            Ok(_) => Ok(OpOutcome::Applied),
            Err(err) => Ok(self.degrade("update", &err.to_string(), UPDATE_FAILED, false)),
        }
    }

    /// Removes the item with `id`; restores the prior value on remote failure.
    ///
    /// Removing from a singleton collection is a no-op.
    pub fn remove(&mut self, ctx: &StoreContext<'_>, id: &str) -> StoreResult<OpOutcome> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::MissingId(self.kind));
        }
        self.error = None;

        let snapshot = self.value.clone();
        let mut next = snapshot.clone();
        match &mut next {
            CollectionValue::List(items) => items.retain(|item| !item.has_id(id)),
            CollectionValue::Record(_) => {
                debug!(
                    "event=store_remove module=store status=skipped collection={} reason=singleton",
                    self.kind
                );
                return Ok(OpOutcome::Applied);
            }
        }
        self.set_value(ctx.storage, next);

        if !ctx.mode.is_live() {
            return Ok(OpOutcome::Applied);
        }

        let result = ctx.api.delete(self.kind, id);
        if ctx.token.is_cancelled() {
            return Ok(OpOutcome::Cancelled);
        }

        match result {
            Ok(()) => Ok(OpOutcome::Applied),
            Err(err) => {
                self.set_value(ctx.storage, snapshot);
                Ok(self.degrade("remove", &err.to_string(), DELETE_FAILED, true))
            }
        }
    }

    /// Replaces the whole value locally (no remote call).
    ///
    /// Input of the wrong shape is conformed to the default.
    pub fn replace(&mut self, storage: &dyn LocalStorage, raw: Value) {
        let value = self.default.conform(raw);
        self.set_value(storage, value);
    }

    fn conform_admin_response(&self, raw: Value) -> CollectionValue {
        match (&self.default, raw) {
            (CollectionValue::List(_), Value::Array(entries)) => {
                CollectionValue::List(normalize_list(entries))
            }
            (CollectionValue::List(_), _) => CollectionValue::List(Vec::new()),
            (CollectionValue::Record(_), raw) => self.default.conform(raw),
        }
    }

    fn degrade(&mut self, op: &str, cause: &str, message: &str, rolled_back: bool) -> OpOutcome {
        warn!(
            "event=store_{} module=store status=degraded collection={} rolled_back={} error={}",
            op, self.kind, rolled_back, cause
        );
        self.error = Some(message.to_string());
        if rolled_back {
            OpOutcome::RolledBack {
                error: message.to_string(),
            }
        } else {
            OpOutcome::AppliedLocally {
                error: message.to_string(),
            }
        }
    }

    fn set_value(&mut self, storage: &dyn LocalStorage, value: CollectionValue) {
        self.value = value;
        self.persist(storage);
    }

    fn persist(&self, storage: &dyn LocalStorage) {
        let encoded = match serde_json::to_string(&self.value.to_json()) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=store_persist module=store status=error collection={} error={}",
                    self.kind, err
                );
                return;
            }
        };
        if let Err(err) = storage.set_item(&self.kind.storage_key(), &encoded) {
            warn!(
                "event=store_persist module=store status=error collection={} error={}",
                self.kind, err
            );
        }
    }
}
