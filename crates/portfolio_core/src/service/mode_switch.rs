//! Persisted mock/live switch with a cancellation generation.
//!
//! # Invariants
//! - The flag is read from local storage once, at construction.
//! - A change takes effect only after the flag is persisted, and then
//!   cancels the previous token.

use crate::cancel::CancelToken;
use crate::model::mode::DataMode;
use crate::repo::local_storage::{LocalStorage, StorageResult};
use log::{info, warn};

pub const MODE_STORAGE_KEY: &str = "portfolio_mock_mode";

/// Current data mode plus the token governing in-flight work.
#[derive(Debug)]
pub struct ModeSwitch {
    mode: DataMode,
    token: CancelToken,
    generation: u64,
}

impl ModeSwitch {
    /// Reads the persisted flag; an unreadable or missing flag means mock mode.
    pub fn load(storage: &dyn LocalStorage) -> Self {
        let stored = match storage.get_item(MODE_STORAGE_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                warn!("event=mode_load module=mode status=error error={err}");
                None
            }
        };
        Self {
            mode: DataMode::from_persisted(stored.as_deref()),
            token: CancelToken::new(),
            generation: 0,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Token for work started under the current mode.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Number of mode changes since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switches to `mode`; returns `false` when it was already active.
    ///
    /// The flag is written first; when that fails nothing changes. Otherwise
    /// the previous token is cancelled and a fresh one issued.
    pub fn set(&mut self, storage: &dyn LocalStorage, mode: DataMode) -> StorageResult<bool> {
        if mode == self.mode {
            return Ok(false);
        }
        storage.set_item(MODE_STORAGE_KEY, mode.as_persisted())?;
        self.token.cancel();
        self.token = CancelToken::new();
        self.generation += 1;
        self.mode = mode;
        info!(
            "event=mode_change module=mode status=ok mode={} generation={}",
            mode, self.generation
        );
        Ok(true)
    }

    pub fn toggle(&mut self, storage: &dyn LocalStorage) -> StorageResult<DataMode> {
        let next = self.mode.toggled();
        self.set(storage, next)?;
        Ok(next)
    }
}
