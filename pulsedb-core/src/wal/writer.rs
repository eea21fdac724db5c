//! WAL appender with wall-clock partition rotation

use super::{partition, Clock, WalAppend, WalConfig, WalEntry};
use crate::{PulseError, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use tracing::error;

/// WAL appender.
///
/// Wall-clock time is bucketized into windows of `partition_size_secs`
/// aligned at the Unix epoch; a partition file is named by the Unix second
/// its window closes at. A partition is active while `now` is strictly
/// before that timestamp, and the check runs on every append under the
/// exclusive lock.
///
/// Append takes the lock exclusively; replay takes it shared so rotation
/// cannot run under a listing.
pub struct WalWriter {
    config: WalConfig,
    clock: Clock,
    state: RwLock<WriterState>,
}

#[derive(Default)]
pub(super) struct WriterState {
    file: Option<File>,
    partition_ts: i64,
}

impl WriterState {
    /// Close the open partition. Errors are logged, not returned.
    fn close_current(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(err) = file.sync_all() {
                error!(error = %err, "failed to sync wal partition on close");
            }
        }
        self.partition_ts = 0;
    }
}

impl WalWriter {
    /// Create an appender. No file is opened until the first append.
    pub fn new(config: WalConfig, clock: Clock) -> Self {
        Self {
            config,
            clock,
            state: RwLock::new(WriterState::default()),
        }
    }

    /// Appender configuration
    pub fn config(&self) -> &WalConfig {
        &self.config
    }

    /// Block until `shutdown` resolves, then close the open partition.
    /// A later append re-opens or rotates on demand.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        shutdown.await;
        self.state.write().close_current();
    }

    /// Shared view used by replay for a consistent partition set
    pub(super) fn lock_shared(&self) -> RwLockReadGuard<'_, WriterState> {
        self.state.read()
    }

    /// Closing timestamp of the window containing `now`
    fn next_partition_ts(&self, now: i64) -> i64 {
        let size = self.config.partition_size_secs;
        now.div_euclid(size) * size + size
    }

    fn open_append(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(PulseError::Io)
    }
}

impl WalAppend for WalWriter {
    fn append(&self, entry: &WalEntry) -> Result<()> {
        let mut state = self.state.write();
        let now = (self.clock)();

        if state.file.is_none() {
            // First append since start or close: adopt the most recent
            // partition if its window has not closed yet.
            if let Some(latest) = partition::list_partitions(&self.config.dir)?.pop() {
                if now < latest.timestamp {
                    state.file = Some(Self::open_append(&latest.path)?);
                    state.partition_ts = latest.timestamp;
                }
            }
        }

        if state.file.is_none() || now >= state.partition_ts {
            let next_ts = self.next_partition_ts(now);
            state.close_current();

            let path = partition::partition_path(&self.config.dir, next_ts);
            state.file = Some(Self::open_append(&path)?);
            state.partition_ts = next_ts;
        }

        let file = match state.file.as_mut() {
            Some(file) => file,
            None => return Err(PulseError::Io(std::io::Error::other("no open wal partition"))),
        };

        let frame = entry.encode()?;
        file.write_all(&frame)?;

        // No append is acknowledged before it reaches stable storage
        file.sync_all()?;

        Ok(())
    }
}
