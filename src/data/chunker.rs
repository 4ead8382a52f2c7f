// ============================================================
// Layer 4: Length Bucketing (sort + chunk)
// ============================================================
// Groups utterances of similar length so each batch can be
// padded to its own local maximum instead of the global one.
//
// Two steps:
//   1. Stable sort by frame count (ascending). Equal lengths keep
//      their original relative order.
//   2. Cut the sorted sequence into contiguous runs of
//      batch_size. The final run may be shorter.
//
// Example with lengths [5, 2, 2, 8] and batch_size = 2:
//   sorted order : [1, 2, 0, 3]     (lengths 2, 2, 5, 8)
//   chunks       : [1, 2] [0, 3]
//
// Reference: Rust Book §8 (Vectors), std::slice::sort_by_key

use std::ops::Range;

/// Indices that visit `lengths` in ascending order.
/// Uses a stable sort, so ties resolve by original position.
pub fn sort_by_length(lengths: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by_key(|&i| lengths[i]);
    order
}

/// Apply a permutation produced by `sort_by_length` to an owned Vec.
pub fn permute<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    debug_assert_eq!(items.len(), order.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect()
}

pub struct Chunker {
    /// Utterances per chunk
    batch_size: usize,
}

impl Chunker {
    /// # Panics
    /// Panics if batch_size is 0 (PipelineParams::validate rejects it
    /// before a Chunker is ever built).
    pub fn new(batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be at least 1");
        Self { batch_size }
    }

    /// ceil(n / batch_size)
    pub fn num_chunks(&self, n: usize) -> usize {
        n.div_ceil(self.batch_size)
    }

    /// Contiguous index ranges covering 0..n, in order.
    pub fn ranges(&self, n: usize) -> Vec<Range<usize>> {
        (0..self.num_chunks(n))
            .map(|c| {
                let start = c * self.batch_size;
                start..(start + self.batch_size).min(n)
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_ascending_and_stable() {
        let order = sort_by_length(&[5, 2, 2, 8]);
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_stability_with_many_ties() {
        let order = sort_by_length(&[3, 1, 3, 1, 3]);
        assert_eq!(order, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_permute() {
        let items = vec!["a", "b", "c", "d"];
        assert_eq!(permute(items, &[1, 2, 0, 3]), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_chunk_count_and_sizes() {
        let c = Chunker::new(3);
        assert_eq!(c.num_chunks(10), 4);
        let sizes: Vec<usize> = c.ranges(10).iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let c = Chunker::new(4);
        let ranges = c.ranges(9);
        assert_eq!(ranges, vec![0..4, 4..8, 8..9]);
    }

    #[test]
    fn test_empty_gives_no_chunks() {
        let c = Chunker::new(5);
        assert_eq!(c.num_chunks(0), 0);
        assert!(c.ranges(0).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_batch_size_panics() {
        let _ = Chunker::new(0);
    }
}
