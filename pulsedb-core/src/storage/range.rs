//! Timestamp-range window over a sorted sample list

use crate::Sample;

/// Return the contiguous `[from_ms, to_ms]` inclusive window of a
/// timestamp-sorted sample list as a borrowed subslice.
///
/// Both bounds are located by binary search; no allocation happens. If no
/// sample reaches `from_ms`, or the window closes before the first
/// candidate, the result is empty.
pub fn filter_range(samples: &[Sample], from_ms: i64, to_ms: i64) -> &[Sample] {
    let lower = samples.partition_point(|s| s.timestamp < from_ms);
    let upper = samples.partition_point(|s| s.timestamp <= to_ms);

    if lower >= upper {
        return &[];
    }

    &samples[lower..upper]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_at(timestamps: &[i64]) -> Vec<Sample> {
        timestamps
            .iter()
            .map(|&ts| Sample::new(ts as f64, ts))
            .collect()
    }

    fn timestamps(samples: &[Sample]) -> Vec<i64> {
        samples.iter().map(|s| s.timestamp).collect()
    }

    #[test]
    fn test_inclusive_window_with_duplicates() {
        let samples = samples_at(&[1, 2, 2, 3, 5, 8]);
        let got = filter_range(&samples, 2, 5);
        assert_eq!(timestamps(got), vec![2, 2, 3, 5]);
    }

    #[test]
    fn test_window_past_all_samples() {
        let samples = samples_at(&[1, 2, 2, 3, 5, 8]);
        assert!(filter_range(&samples, 9, 15).is_empty());
    }

    #[test]
    fn test_window_before_all_samples() {
        let samples = samples_at(&[1, 2, 2, 3, 5, 8]);
        assert!(filter_range(&samples, -3, 0).is_empty());
    }

    #[test]
    fn test_exact_bounds() {
        let samples = samples_at(&[1, 2, 3]);
        assert_eq!(timestamps(filter_range(&samples, 1, 3)), vec![1, 2, 3]);
        assert_eq!(timestamps(filter_range(&samples, 2, 2)), vec![2]);
    }

    #[test]
    fn test_result_is_contiguous_view() {
        let samples = samples_at(&[10, 20, 30, 40]);
        let got = filter_range(&samples, 15, 35);
        // The window borrows from the input rather than copying it
        assert!(std::ptr::eq(got.as_ptr(), &samples[1]));
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_range(&[], 0, 100).is_empty());
    }
}
