//! Deterministic 64-bit fingerprint of a label set
//!
//! The fingerprint keys the series registry, so it must be stable across
//! restarts: WAL-replayed series have to collapse onto the same series id
//! as freshly written ones.

use crate::Label;
use fnv::FnvHasher;
use std::hash::Hasher;

/// Compute the FNV-1a 64-bit fingerprint of a label set.
///
/// Pairs are hashed sorted by name ascending, as `name=value` joined by
/// `,`. The separators keep `a=bc` and `ab=c` from colliding. Sorting
/// happens on a local copy; the caller's slice is never reordered.
pub fn fingerprint(labels: &[Label]) -> u64 {
    let mut sorted: Vec<&Label> = labels.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut hasher = FnvHasher::default();
    for (idx, label) in sorted.iter().enumerate() {
        hasher.write(label.name.as_bytes());
        hasher.write(b"=");
        hasher.write(label.value.as_bytes());

        if idx != sorted.len() - 1 {
            hasher.write(b",");
        }
    }

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_labels() -> Vec<Label> {
        vec![
            Label::new("test", "123"),
            Label::new("namespace", "jobs"),
            Label::new("state", "stable"),
            Label::new("abc", "hello"),
        ]
    }

    #[test]
    fn test_pinned_digest() {
        assert_eq!(fingerprint(&canonical_labels()), 8341061335512845696);
    }

    #[test]
    fn test_order_independent() {
        let labels = canonical_labels();
        let expected = fingerprint(&labels);

        let mut reversed = labels.clone();
        reversed.reverse();
        assert_eq!(fingerprint(&reversed), expected);

        let rotated: Vec<Label> = labels[2..]
            .iter()
            .chain(labels[..2].iter())
            .cloned()
            .collect();
        assert_eq!(fingerprint(&rotated), expected);
    }

    #[test]
    fn test_caller_slice_untouched() {
        let labels = canonical_labels();
        let before = labels.clone();
        fingerprint(&labels);
        assert_eq!(labels, before);
    }

    #[test]
    fn test_separators_prevent_boundary_collisions() {
        let a = vec![Label::new("a", "bc")];
        let b = vec![Label::new("ab", "c")];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_distinct_sets_differ() {
        let a = vec![Label::new("job", "scraper")];
        let b = vec![Label::new("job", "scraper"), Label::new("env", "prod")];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }
}
