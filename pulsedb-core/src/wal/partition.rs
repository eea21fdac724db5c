//! WAL partition directory listing
//!
//! Partition files are named `<unix_seconds>.wal`. Anything else in the
//! directory, including subdirectories and files whose prefix does not
//! parse as a decimal timestamp, is ignored.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

const PARTITION_SUFFIX: &str = ".wal";

/// One WAL partition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Timestamp parsed from the file name
    pub timestamp: i64,
    /// Full path to the file
    pub path: PathBuf,
}

/// List partition files sorted by parsed timestamp ascending.
///
/// The listing is a point-in-time snapshot; callers that need it stable
/// against rotation hold the appender's lock.
pub fn list_partitions(dir: &Path) -> Result<Vec<Partition>> {
    let mut partitions = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if dir_entry.file_type()?.is_dir() {
            continue;
        }

        let file_name = dir_entry.file_name();
        if let Some(timestamp) = file_name
            .to_str()
            .and_then(|name| name.strip_suffix(PARTITION_SUFFIX))
            .and_then(|prefix| prefix.parse::<i64>().ok())
        {
            partitions.push(Partition {
                timestamp,
                path: dir_entry.path(),
            });
        }
    }

    partitions.sort_by_key(|p| p.timestamp);

    Ok(partitions)
}

/// Path of the partition file for `timestamp`
pub(super) fn partition_path(dir: &Path, timestamp: i64) -> PathBuf {
    dir.join(format!("{timestamp}{PARTITION_SUFFIX}"))
}
