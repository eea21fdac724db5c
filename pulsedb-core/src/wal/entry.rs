//! WAL entry and its length-framed JSON codec
//!
//! On disk every record is `<u32-LE length><length JSON bytes>`, records
//! back to back with no other separator. The JSON field names are part of
//! the on-disk format and must not change.

use crate::{PulseError, Result, TimeSeries};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read};

/// A single WAL record: one accepted ingest batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WalEntry {
    /// Wall-clock seconds at append time; metadata only, not monotonic
    pub timestamp: i64,
    /// The accepted batch
    pub time_series: Vec<TimeSeries>,
}

impl WalEntry {
    /// Create a new entry
    pub fn new(timestamp: i64, time_series: Vec<TimeSeries>) -> Self {
        Self {
            timestamp,
            time_series,
        }
    }

    /// Encode the entry as one length-prefixed frame
    pub fn encode(&self) -> Result<Bytes> {
        let json = serde_json::to_vec(self).map_err(PulseError::EntryEncode)?;

        let mut buf = BytesMut::with_capacity(4 + json.len());
        buf.put_u32_le(json.len() as u32);
        buf.put_slice(&json);

        Ok(buf.freeze())
    }

    /// Decode the next frame from `reader`.
    ///
    /// Returns `Ok(None)` on a clean end of file (zero bytes available).
    /// A torn length prefix or a short payload read is reported as
    /// [`PulseError::PartitionCorrupt`]; malformed JSON as
    /// [`PulseError::EntryDecode`].
    pub fn decode_from<R: Read>(reader: &mut R) -> Result<Option<WalEntry>> {
        let mut len_buf = [0u8; 4];
        let mut filled = 0;
        while filled < len_buf.len() {
            let n = reader.read(&mut len_buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < len_buf.len() {
            return Err(PulseError::PartitionCorrupt(
                "torn length prefix at end of file".to_string(),
            ));
        }

        let length = u32::from_le_bytes(len_buf) as usize;
        let mut payload = vec![0u8; length];
        reader.read_exact(&mut payload).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                PulseError::PartitionCorrupt(format!(
                    "record truncated: expected {length} payload bytes"
                ))
            } else {
                PulseError::Io(err)
            }
        })?;

        let entry = serde_json::from_slice(&payload).map_err(PulseError::EntryDecode)?;

        Ok(Some(entry))
    }
}
