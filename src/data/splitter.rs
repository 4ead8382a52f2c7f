// ============================================================
// Layer 4: Train/Dev/Test Splitter
// ============================================================
// Shuffles the whole pool once, then cuts it by count:
//
//   train : [0,        n/2)        first half
//   dev   : [n/2,      3n/4)       next quarter
//   test  : [3n/4,     n)          remainder
//
// Both cut points use integer division, so with small pools the
// dev or test slice can be empty. That is allowed: an empty slice
// becomes a Subset with zero batches.
//
// Why shuffle before splitting?
//   Pools are often stored grouped by speaker or session. Without
//   a shuffle, dev and test would only see the tail of that order.
//
// Uses Fisher-Yates via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which pool positions ended up in which split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub train: Vec<usize>,
    pub dev: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitPlan {
    /// Shuffle 0..n and cut it 50 / 25 / 25.
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Self::from_order(order)
    }

    /// Cut an already-ordered list of pool positions.
    pub fn from_order(mut order: Vec<usize>) -> Self {
        let n = order.len();
        let train_end = n / 2;
        let dev_end = 3 * n / 4;

        let test = order.split_off(dev_end);
        let dev = order.split_off(train_end);

        tracing::debug!(
            "Pool split: {} train, {} dev, {} test",
            order.len(),
            dev.len(),
            test.len()
        );

        Self { train: order, dev, test }
    }

    pub fn total(&self) -> usize {
        self.train.len() + self.dev.len() + self.test.len()
    }

    /// Move `items` into three Vecs following this plan.
    ///
    /// # Panics
    /// Panics if the plan names a position outside `items` or names
    /// the same position twice.
    pub fn partition<T>(&self, items: Vec<T>) -> (Vec<T>, Vec<T>, Vec<T>) {
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        let mut take = |positions: &[usize]| -> Vec<T> {
            positions
                .iter()
                .map(|&i| slots[i].take().expect("split plan reuses a pool position"))
                .collect()
        };
        let train = take(&self.train);
        let dev = take(&self.dev);
        let test = take(&self.test);
        (train, dev, test)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_sizes() {
        let plan = SplitPlan::from_order((0..100).collect());
        assert_eq!(plan.train.len(), 50);
        assert_eq!(plan.dev.len(), 25);
        assert_eq!(plan.test.len(), 25);
    }

    #[test]
    fn test_uneven_sizes_follow_integer_cuts() {
        // n = 7: train [0, 3), dev [3, 5), test [5, 7)
        let plan = SplitPlan::from_order((0..7).collect());
        assert_eq!(plan.train, vec![0, 1, 2]);
        assert_eq!(plan.dev, vec![3, 4]);
        assert_eq!(plan.test, vec![5, 6]);
    }

    #[test]
    fn test_disjoint_and_covering() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in [0, 1, 2, 3, 5, 10, 33] {
            let plan = SplitPlan::shuffled(n, &mut rng);
            assert_eq!(plan.total(), n);

            let mut all: Vec<usize> = plan
                .train
                .iter()
                .chain(&plan.dev)
                .chain(&plan.test)
                .copied()
                .collect();
            all.sort_unstable();
            assert_eq!(all, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_tiny_pool_leaves_empty_splits() {
        let plan = SplitPlan::from_order(vec![0]);
        assert!(plan.train.is_empty());
        assert!(plan.dev.is_empty());
        assert_eq!(plan.test, vec![0]);
    }

    #[test]
    fn test_partition_moves_items() {
        let plan = SplitPlan::from_order(vec![3, 0, 2, 1]);
        let (tr, de, te) = plan.partition(vec!["a", "b", "c", "d"]);
        assert_eq!(tr, vec!["d", "a"]);
        assert_eq!(de, vec!["c"]);
        assert_eq!(te, vec!["b"]);
    }
}
