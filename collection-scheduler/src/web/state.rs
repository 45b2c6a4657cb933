//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::schedules::{AdvanceReport, ScheduleError, ScheduleManager};
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Every request that reads and then writes the store does so under one
/// lock guard.
#[derive(Clone)]
pub struct AppState {
    /// The single store behind the service
    pub store: Arc<Mutex<InMemoryStore>>,

    /// Scheduling configuration
    pub config: Arc<SchedulerConfig>,

    /// Source of "today"
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: InMemoryStore, config: SchedulerConfig, clock: impl Clock + 'static) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
            clock: Arc::new(clock),
        }
    }

    /// Run the batch advance under the store lock.
    ///
    /// Shared by the `/schedules/advance` route and the periodic task.
    pub async fn advance_due_schedules(&self) -> Result<AdvanceReport, ScheduleError> {
        let mut store = self.store.lock().await;
        ScheduleManager::new(&mut *store, &*self.clock, &self.config).advance_due_schedules()
    }
}
