//! WAL replay for crash recovery

use super::{partition, WalEntry, WalWriter};
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// WAL replayer.
///
/// Shares the appender's lock so the partition set it reads cannot rotate
/// underneath it. Replay returns entries; applying them to storage is the
/// caller's job.
pub struct WalReader {
    wal: Arc<WalWriter>,
}

impl WalReader {
    /// Create a replayer over the given appender
    pub fn new(wal: Arc<WalWriter>) -> Self {
        Self { wal }
    }

    /// Replay every valid partition, partition-order ascending and
    /// record-order ascending within each.
    ///
    /// A partition that cannot be fully decoded contributes nothing: it is
    /// logged and skipped while the rest of the replay proceeds. Only a
    /// directory listing failure fails the whole call.
    pub fn replay(&self) -> Result<Vec<WalEntry>> {
        let _guard = self.wal.lock_shared();

        let partitions = partition::list_partitions(&self.wal.config().dir)?;

        let mut entries = Vec::new();
        for part in &partitions {
            match read_partition(&part.path) {
                Ok(mut file_entries) => {
                    info!(
                        file = %part.path.display(),
                        count = file_entries.len(),
                        "replayed wal partition"
                    );
                    entries.append(&mut file_entries);
                }
                Err(err) => {
                    warn!(
                        file = %part.path.display(),
                        error = %err,
                        "skipping unreadable wal partition"
                    );
                }
            }
        }

        Ok(entries)
    }
}

fn read_partition(path: &Path) -> Result<Vec<WalEntry>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut entries = Vec::new();
    while let Some(entry) = WalEntry::decode_from(&mut reader)? {
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use crate::wal::{Clock, WalAppend, WalConfig};
    use crate::{Label, LabelMatcher, Sample, TimeSeries};
    use std::fs;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tempfile::TempDir;

    fn manual_clock(start: i64) -> (Arc<AtomicI64>, Clock) {
        let now = Arc::new(AtomicI64::new(start));
        let shared = now.clone();
        (now, Arc::new(move || shared.load(Ordering::SeqCst)))
    }

    fn entry(seq: i64) -> WalEntry {
        WalEntry::new(
            seq,
            vec![TimeSeries::new(
                vec![Label::new("seq", seq.to_string())],
                vec![Sample::new(seq as f64, seq * 1000)],
            )],
        )
    }

    fn writer_at(dir: &TempDir, partition_size_secs: i64, start: i64) -> (Arc<AtomicI64>, Arc<WalWriter>) {
        let (now, clock) = manual_clock(start);
        let writer = Arc::new(WalWriter::new(
            WalConfig {
                dir: dir.path().to_path_buf(),
                partition_size_secs,
            },
            clock,
        ));
        (now, writer)
    }

    #[test]
    fn test_rotation_and_replay_order() {
        let dir = TempDir::new().unwrap();
        let (now, writer) = writer_at(&dir, 2, 0);

        // Four appends spanning three partition windows
        writer.append(&entry(1)).unwrap();
        writer.append(&entry(2)).unwrap();
        now.store(2, Ordering::SeqCst);
        writer.append(&entry(3)).unwrap();
        now.store(4, Ordering::SeqCst);
        writer.append(&entry(4)).unwrap();

        assert_eq!(partition::list_partitions(dir.path()).unwrap().len(), 3);

        let replayed = WalReader::new(writer).replay().unwrap();
        let order: Vec<i64> = replayed.iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_directory_replays_nothing() {
        let dir = TempDir::new().unwrap();
        let (_, writer) = writer_at(&dir, 30, 0);
        assert!(WalReader::new(writer).replay().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let (_, clock) = manual_clock(0);
        let writer = Arc::new(WalWriter::new(
            WalConfig {
                dir: dir.path().join("missing"),
                partition_size_secs: 30,
            },
            clock,
        ));
        assert!(WalReader::new(writer).replay().is_err());
    }

    #[test]
    fn test_corrupt_partition_skipped_entirely() {
        let dir = TempDir::new().unwrap();
        let (now, writer) = writer_at(&dir, 2, 0);

        writer.append(&entry(1)).unwrap();
        now.store(2, Ordering::SeqCst);
        writer.append(&entry(2)).unwrap();
        now.store(4, Ordering::SeqCst);
        writer.append(&entry(3)).unwrap();

        // Tear the tail off the middle partition; its good leading record
        // is dropped along with the torn one
        let middle = dir.path().join("4.wal");
        let mut torn = fs::read(&middle).unwrap();
        torn.extend_from_slice(&entry(9).encode().unwrap()[..7]);
        fs::write(&middle, torn).unwrap();

        let replayed = WalReader::new(writer).replay().unwrap();
        let order: Vec<i64> = replayed.iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn test_garbage_file_with_partition_name_skipped() {
        let dir = TempDir::new().unwrap();
        let (_, writer) = writer_at(&dir, 60, 0);

        writer.append(&entry(1)).unwrap();
        fs::write(dir.path().join("5.wal"), b"zz").unwrap();

        let replayed = WalReader::new(writer).replay().unwrap();
        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0].timestamp, 1);
    }

    #[test]
    fn test_replayed_entries_rebuild_storage() {
        let dir = TempDir::new().unwrap();
        let (now, writer) = writer_at(&dir, 2, 0);

        writer.append(&entry(1)).unwrap();
        now.store(2, Ordering::SeqCst);
        writer.append(&entry(2)).unwrap();

        let storage = MemoryStorage::new();
        for replayed in WalReader::new(writer).replay().unwrap() {
            storage.write_many(replayed.time_series);
        }

        let result = storage.read(0, 10_000, &[LabelMatcher::eq("seq", "2")]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].samples, vec![Sample::new(2.0, 2000)]);
    }
}
