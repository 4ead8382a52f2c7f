// ============================================================
// Layer 4: Epoch View
// ============================================================
// Maps a logical batch position (the order the training loop
// asks for batches) onto a physical chunk index.
//
// The view is a plain permutation of 0..num_chunks. A new view
// replaces the old one at every epoch boundary; chunks are never
// reordered in memory.

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpochView {
    order: Vec<usize>,
}

impl EpochView {
    /// 0, 1, ..., n-1
    pub fn identity(n: usize) -> Self {
        Self { order: (0..n).collect() }
    }

    /// A uniformly random permutation of 0..n (Fisher-Yates).
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut view = Self::identity(n);
        view.order.shuffle(rng);
        view
    }

    /// Physical chunk index for logical position `pos`.
    pub fn resolve(&self, pos: usize) -> Option<usize> {
        self.order.get(pos).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(i, &c)| i == c)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_bijection(view: &EpochView) -> bool {
        let mut seen = vec![false; view.len()];
        for &c in view.as_slice() {
            if c >= seen.len() || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }

    #[test]
    fn test_identity() {
        let v = EpochView::identity(4);
        assert_eq!(v.as_slice(), &[0, 1, 2, 3]);
        assert!(v.is_identity());
        assert_eq!(v.resolve(2), Some(2));
        assert_eq!(v.resolve(4), None);
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [0, 1, 2, 17, 100] {
            let v = EpochView::shuffled(n, &mut rng);
            assert_eq!(v.len(), n);
            assert!(is_bijection(&v));
        }
    }

    #[test]
    fn test_shuffled_moves_something() {
        // 20 draws of a 10-element permutation all being identity
        // has probability (1/10!)^20
        let mut rng = StdRng::seed_from_u64(11);
        let any_moved = (0..20).any(|_| !EpochView::shuffled(10, &mut rng).is_identity());
        assert!(any_moved);
    }

    #[test]
    fn test_empty_view() {
        let v = EpochView::identity(0);
        assert!(v.is_empty());
        assert_eq!(v.resolve(0), None);
    }
}
