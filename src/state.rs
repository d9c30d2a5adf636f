//! Application state shared by the event worker, the schedulers and admin operations.
//!
//! The state is initialized once during startup and then cloned into each consumer. All
//! fields are reference-counted, so clones share the same store, platform and locks.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{config::Config, data::store::RoleStore, platform::GuildPlatform};

/// Application state containing shared resources and dependencies.
#[derive(Clone)]
pub struct AppState {
    /// In-memory documents. Locked for short read-modify-write sections only, never across
    /// a platform call.
    pub store: Arc<Mutex<RoleStore>>,

    /// Chat platform used for snapshots, role changes and audit messages.
    pub platform: Arc<dyn GuildPlatform>,

    pub config: Arc<Config>,

    /// Serializes expiry sweeps and reconciliation passes per guild.
    pub guild_locks: GuildLocks,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `store` - Opened document store
    /// - `platform` - Platform implementation
    /// - `config` - Application configuration
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(store: RoleStore, platform: Arc<dyn GuildPlatform>, config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            platform,
            config: Arc::new(config),
            guild_locks: GuildLocks::default(),
        }
    }
}

/// One async mutex per guild, created on first use.
#[derive(Clone, Default)]
pub struct GuildLocks {
    locks: Arc<StdMutex<HashMap<u64, Arc<Mutex<()>>>>>,
}

impl GuildLocks {
    /// Waits for exclusive access to a guild.
    ///
    /// The returned guard releases the guild when dropped.
    pub async fn lock(&self, guild_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(guild_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}
