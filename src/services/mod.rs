pub mod api_client;
pub mod network_monitor;
pub mod offline_service;
pub mod sync_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use api_client::{ApiClient, ProgressApi};
pub use network_monitor::NetworkMonitor;
pub use offline_service::{AppStore, BrowserStorage, LocalStore, MemoryStore, OfflineService};
pub use sync_service::ProgressSyncEngine;
