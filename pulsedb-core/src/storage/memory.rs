//! In-memory label-indexed sample store

use super::{filter_range, fingerprint, intersect, Storage};
use crate::{Label, LabelMatcher, MatcherType, Sample, TimeSeries};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Monotonically assigned series identifier; 0 is reserved as unassigned.
pub type SeriesId = u64;

#[derive(Default)]
struct IndexState {
    /// Last assigned series id; the first real series gets id 1
    last_sid: SeriesId,
    /// Fingerprint of a label set -> series id
    series_by_fp: HashMap<u64, SeriesId>,
    /// Series id -> full label set it was registered with
    labels_by_id: HashMap<SeriesId, HashMap<String, String>>,
    /// Series id -> samples in append order
    samples: HashMap<SeriesId, Vec<Sample>>,
    /// Inverted index: label name -> label value -> posting list.
    /// Posting lists stay sid-ascending because sids are assigned
    /// monotonically and inserted only on first registration.
    index: HashMap<String, HashMap<String, Vec<SeriesId>>>,
}

/// Label-indexed in-memory sample store.
///
/// A single reader/writer lock serializes writes and lets reads share.
/// The store never produces errors: corrupt input (empty labels or
/// samples) is a no-op at the boundary, and absence of data reads as an
/// empty result.
pub struct MemoryStorage {
    state: RwLock<IndexState>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Number of registered series
    pub fn series_count(&self) -> usize {
        self.state.read().labels_by_id.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn write_one(&self, labels: Vec<Label>, samples: Vec<Sample>) {
        if labels.is_empty() || samples.is_empty() {
            return;
        }

        let mut guard = self.state.write();
        let state = &mut *guard;

        let fp = fingerprint(&labels);
        if let Some(sid) = state.series_by_fp.get(&fp).copied() {
            // Fast path: known label set, postings already built
            state.samples.entry(sid).or_default().extend(samples);
            return;
        }

        state.last_sid += 1;
        let sid = state.last_sid;
        state.series_by_fp.insert(fp, sid);
        state.samples.insert(sid, samples);

        let mut by_name = HashMap::with_capacity(labels.len());
        for label in labels {
            state
                .index
                .entry(label.name.clone())
                .or_default()
                .entry(label.value.clone())
                .or_default()
                .push(sid);
            by_name.insert(label.name, label.value);
        }
        state.labels_by_id.insert(sid, by_name);
    }

    fn write_many(&self, series: Vec<TimeSeries>) {
        for ts in series {
            self.write_one(ts.labels, ts.samples);
        }
    }

    fn read(&self, from_ms: i64, to_ms: i64, matchers: &[LabelMatcher]) -> Vec<TimeSeries> {
        let state = self.state.read();

        let (eq, neq): (Vec<_>, Vec<_>) = matchers
            .iter()
            .partition(|m| m.matcher_type == MatcherType::Eq);

        // Candidate set: EQ postings intersected in input order. With zero
        // EQ matchers the candidate set stays empty and so does the result.
        let mut candidates: Vec<SeriesId> = Vec::new();
        for (idx, matcher) in eq.iter().enumerate() {
            let postings = match state
                .index
                .get(&matcher.name)
                .and_then(|by_value| by_value.get(&matcher.value))
            {
                Some(postings) => postings,
                None => return Vec::new(),
            };

            if idx == 0 {
                candidates = postings.clone();
            } else {
                candidates = intersect(&candidates, postings);
            }

            if candidates.is_empty() {
                return Vec::new();
            }
        }

        let mut result = Vec::with_capacity(candidates.len());
        for sid in candidates {
            let labels = match state.labels_by_id.get(&sid) {
                Some(labels) => labels,
                None => continue,
            };

            let rejected = neq
                .iter()
                .any(|m| labels.get(&m.name).is_some_and(|v| *v == m.value));
            if rejected {
                continue;
            }

            // A window that filters every sample out still emits the series
            let samples = state
                .samples
                .get(&sid)
                .map(|all| filter_range(all, from_ms, to_ms).to_vec())
                .unwrap_or_default();

            let labels = labels
                .iter()
                .map(|(name, value)| Label::new(name.clone(), value.clone()))
                .collect();

            result.push(TimeSeries::new(labels, samples));
        }

        result
    }
}
