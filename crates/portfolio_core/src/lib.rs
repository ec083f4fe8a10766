//! Content-administration core for a personal portfolio site.
//!
//! Collections are edited locally first and, in live mode, written through to
//! the site's REST API. Local storage keeps the last state across sessions.

pub mod api;
pub mod cancel;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use api::{
    ApiError, ApiResult, ContactSubmission, HttpApiClient, MessageStatus, OfflineApi, RemoteApi,
};
pub use cancel::CancelToken;
pub use config::{ConfigError, PortfolioConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::collection::{CollectionKind, CollectionValue, Shape, UnknownCollection};
pub use model::item::{new_item_id, slugify, ContentItem, ItemId};
pub use model::mode::DataMode;
pub use repo::local_storage::{LocalStorage, SqliteLocalStorage, StorageError, StorageResult};
pub use seed::{Seed, SeedResolver, SeedSource};
pub use service::admin_session::{AdminSession, StoreStatus};
pub use service::context::{SeedSources, StoreContext};
pub use service::hybrid_store::{HybridStore, LoadState, OpOutcome, StoreError, StoreResult};
pub use service::mode_switch::{ModeSwitch, MODE_STORAGE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
