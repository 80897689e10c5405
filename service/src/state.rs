//! Shared runtime state for the service.

use presage_core::pause::FillerPool;
use presage_core::table::store::TableStore;
use presage_core::{EngineSettings, ServiceCache};
use presage_types::ServiceConfig;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

pub type SharedState = Arc<RwLock<ServiceState>>;

pub struct ServiceState {
    pub cache: ServiceCache,
    pub config: ServiceConfig,
    pub store: TableStore,
    pub fillers: FillerPool,
    /// Stop sender for the running filler loop, present while paused.
    pub filler_stop: Option<watch::Sender<bool>>,
    pub filler_task: Option<JoinHandle<()>>,
    /// True after a `pre` command: console lines are table data until the
    /// payload terminator (or cancellation).
    pub awaiting_table: bool,
    /// Table-data lines accumulated while `awaiting_table` is set.
    pub table_buffer: Vec<String>,
}

impl ServiceState {
    pub fn new(config: ServiceConfig, store: TableStore) -> Self {
        Self {
            cache: ServiceCache::new(EngineSettings::from(&config)),
            config,
            store,
            fillers: FillerPool::default(),
            filler_stop: None,
            filler_task: None,
            awaiting_table: false,
            table_buffer: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}
