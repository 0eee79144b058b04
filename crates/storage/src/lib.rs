#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! echocast-storage: filesystem-backed persistence for jobs, episodes, and
//! the queue (spec.md §4, §6).

pub mod episode_catalog;
pub mod error;
pub mod job_status_store;
pub mod paths;
pub mod queue;

pub use episode_catalog::{EpisodeCatalog, RETENTION_CAP};
pub use error::StorageError;
pub use job_status_store::JobStatusStore;
pub use paths::DataRoot;
pub use queue::{PendingTicket, QueueStore};
