//! PulseDB Core - Minimal Prometheus-Compatible Time-Series Engine
//!
//! A small time-series storage engine built around two pieces:
//!
//! - **In-memory index**: a label-indexed sample store that resolves
//!   multi-matcher queries through inverted-index intersection and
//!   timestamp-range binary search
//! - **WAL (Write-Ahead Log)**: partitioned, length-framed append-only log
//!   with wall-clock time-slice rotation
//!
//! # Architecture
//!
//! Ingest appends a batch to the WAL first and applies it to the index only
//! after the append has been fsynced. On startup the WAL is replayed in
//! partition order and re-driven through the index before serving traffic.
//! Queries consult only the index.

pub mod storage;
pub mod wal;

mod error;
mod types;

pub use error::{PulseError, Result};
pub use types::*;

/// PulseDB version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod config {
    /// WAL partition window length in seconds
    pub const DEFAULT_PARTITION_SIZE_SECS: i64 = 30;

    /// Directory for WAL partition files
    pub const DEFAULT_PARTITIONS_PATH: &str = "waldata";
}
