pub mod catalog;
pub mod progress;
pub mod sync;

pub use catalog::{catalog, stars_for_score, CatalogEntry, GameId, GameResult, GameType};
pub use progress::{ProgressRecord, ProgressSummary, ProgressUpsertRequest, RemoteProgress};
pub use sync::{ConnectivityStatus, MergePolicy, SyncResult};
