//! Write-Ahead Log (WAL) implementation
//!
//! The WAL makes accepted writes durable before they reach the in-memory
//! index. It is an append-only sequence of length-framed records spread
//! over partition files, one per aligned wall-clock window; on startup the
//! partitions are replayed in order to rebuild the index.

mod entry;
mod partition;
mod reader;
mod writer;

pub use entry::WalEntry;
pub use partition::{list_partitions, Partition};
pub use reader::WalReader;
pub use writer::WalWriter;

use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Injected wall clock returning Unix seconds; tests drive a manual one
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// The system wall clock
pub fn system_clock() -> Clock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default()
    })
}

/// WAL configuration
#[derive(Debug, Clone)]
pub struct WalConfig {
    /// Directory holding partition files
    pub dir: PathBuf,
    /// Length of one partition window in seconds
    pub partition_size_secs: i64,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(crate::config::DEFAULT_PARTITIONS_PATH),
            partition_size_secs: crate::config::DEFAULT_PARTITION_SIZE_SECS,
        }
    }
}

/// Append capability the ingest path depends on.
///
/// Narrow by design: handlers and tests only need to durably log an entry,
/// so fakes can stand in for the real appender.
pub trait WalAppend: Send + Sync {
    /// Durably persist one entry; the caller must not apply the batch to
    /// storage unless this returns success.
    fn append(&self, entry: &WalEntry) -> Result<()>;
}
