// ============================================================
// Layer 4: Overlap Dataset (train / dev / test)
// ============================================================
// Owns three Subsets and feeds each a disjoint slice of one
// globally shuffled pool (50 / 25 / 25 by count).
//
// Only the training subset reshuffles its batches every epoch;
// dev and test keep the length-sorted order.
//
// Reproducibility: without PipelineParams::seed the pool shuffle
// draws from OS entropy, so two runs split differently. With a
// seed, the pool shuffle and each subset's epoch shuffle get
// their own derived StdRng.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::error::DataError;
use crate::data::params::PipelineParams;
use crate::data::splitter::SplitPlan;
use crate::data::subset::{check_pool, Subset};
use crate::domain::utterance::RawPool;

#[derive(Debug)]
pub struct OverlapDataset {
    pub train: Subset,
    pub dev: Subset,
    pub test: Subset,
    params: PipelineParams,
    split: SplitPlan,
}

impl OverlapDataset {
    /// Bind the shared parameters to all three subsets.
    pub fn new(params: PipelineParams) -> Result<Self, DataError> {
        params.validate()?;
        let for_subset = |offset: u64| PipelineParams {
            seed: params.seed.map(|s| s.wrapping_add(offset)),
            ..params.clone()
        };
        Ok(Self {
            train: Subset::new(for_subset(1))?,
            dev: Subset::new(for_subset(2))?,
            test: Subset::new(for_subset(3))?,
            params,
            split: SplitPlan::default(),
        })
    }

    /// Shuffle the pool, split it and load every subset.
    pub fn load(&mut self, pool: RawPool) -> Result<(), DataError> {
        match self.params.seed {
            Some(seed) => self.load_with_rng(pool, &mut StdRng::seed_from_u64(seed)),
            None => self.load_with_rng(pool, &mut rand::thread_rng()),
        }
    }

    pub fn load_with_rng<R: Rng + ?Sized>(
        &mut self,
        pool: RawPool,
        rng: &mut R,
    ) -> Result<(), DataError> {
        // Whole pool, before the split: no subset is touched on
        // error, and indices are pool positions.
        check_pool(&pool.features, &pool.labels, &self.params)?;

        let plan = SplitPlan::shuffled(pool.len(), rng);
        let (tr, de, te) = plan.partition(pool.into_pairs());

        tracing::info!(
            "Split pool of {}: {} train, {} dev, {} test",
            plan.total(),
            tr.len(),
            de.len(),
            te.len()
        );

        let (f, l) = RawPool::from_pairs(tr).into_parts();
        self.train.load(f, l, true)?;
        let (f, l) = RawPool::from_pairs(de).into_parts();
        self.dev.load(f, l, false)?;
        let (f, l) = RawPool::from_pairs(te).into_parts();
        self.test.load(f, l, false)?;

        self.split = plan;
        Ok(())
    }

    /// Epoch boundary for every subset.
    pub fn on_epoch_end(&mut self) {
        self.train.on_epoch_end();
        self.dev.on_epoch_end();
        self.test.on_epoch_end();
    }

    /// Pool positions assigned to each subset by the last load
    pub fn split(&self) -> &SplitPlan {
        &self.split
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// (name, subset) pairs in train, dev, test order.
    pub fn subsets(&self) -> [(&'static str, &Subset); 3] {
        [("train", &self.train), ("dev", &self.dev), ("test", &self.test)]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Utterance i has (i % 7) + 1 frames, each frame filled with i.
    fn pool(n: usize) -> RawPool {
        let features = (0..n)
            .map(|i| vec![vec![i as f32; 2]; i % 7 + 1])
            .collect();
        let labels = (0..n).map(|i| vec![(i % 2) as u32; i % 7 + 1]).collect();
        RawPool::new(features, labels)
    }

    fn params() -> PipelineParams {
        PipelineParams {
            batch_size: 4,
            utt_in_dim: 2,
            seed: Some(17),
            ..Default::default()
        }
    }

    /// Recover the pool index of every utterance held by a subset.
    fn pool_indices(subset: &Subset) -> Vec<usize> {
        subset
            .chunks()
            .iter()
            .flat_map(|c| (0..c.utt_num()).map(move |u| c.feature_row(u)[0] as usize))
            .collect()
    }

    #[test]
    fn test_split_sizes_sum_to_pool() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(pool(41)).unwrap();
        assert_eq!(ds.train.utterance_count(), 20);
        assert_eq!(ds.dev.utterance_count(), 10);
        assert_eq!(ds.test.utterance_count(), 11);
        assert_eq!(ds.split().total(), 41);
    }

    #[test]
    fn test_subsets_are_disjoint() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(pool(30)).unwrap();

        let mut all: Vec<usize> = ds
            .subsets()
            .iter()
            .flat_map(|(_, s)| pool_indices(s))
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());

        let mut train = pool_indices(&ds.train);
        train.sort_unstable();
        let mut planned = ds.split().train.clone();
        planned.sort_unstable();
        assert_eq!(train, planned);
    }

    #[test]
    fn test_only_train_shuffles() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(pool(80)).unwrap();
        assert!(ds.train.shuffles());
        assert!(!ds.dev.shuffles());
        assert!(!ds.test.shuffles());
        ds.on_epoch_end();
        assert!(ds.dev.epoch().is_identity());
        assert!(ds.test.epoch().is_identity());
    }

    #[test]
    fn test_seeded_runs_agree() {
        let mut a = OverlapDataset::new(params()).unwrap();
        let mut b = OverlapDataset::new(params()).unwrap();
        a.load(pool(25)).unwrap();
        b.load(pool(25)).unwrap();
        assert_eq!(a.split(), b.split());
        assert_eq!(a.train.epoch(), b.train.epoch());
    }

    #[test]
    fn test_tiny_pool_gives_empty_subsets() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(pool(1)).unwrap();
        assert!(ds.train.is_empty());
        assert!(ds.dev.is_empty());
        assert_eq!(ds.test.len(), 1);
    }

    #[test]
    fn test_empty_pool() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(RawPool::default()).unwrap();
        assert!(ds.subsets().iter().all(|(_, s)| s.is_empty()));
    }

    #[test]
    fn test_pool_count_mismatch_rejected() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        let mut p = pool(6);
        p.labels.pop();
        assert!(matches!(
            ds.load(p),
            Err(DataError::SampleCountMismatch { features: 6, labels: 5 })
        ));
    }

    #[test]
    fn test_bad_utterance_rejected_before_any_subset_loads() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        ds.load(pool(20)).unwrap();
        let split_before = ds.split().clone();
        let train_before = ds.train.chunks().to_vec();

        // the bad utterance lands in the test slice of the next split
        let mut p = pool(40);
        let plan = SplitPlan::shuffled(40, &mut StdRng::seed_from_u64(17));
        let bad = plan.test[0];
        p.labels[bad].push(0);

        let err = ds.load(p).unwrap_err();
        assert_eq!(
            err,
            DataError::LengthMismatch {
                index: bad,
                frames: bad % 7 + 1,
                labels: bad % 7 + 2,
            }
        );
        assert_eq!(ds.split(), &split_before);
        assert_eq!(ds.train.chunks(), train_before.as_slice());
        assert_eq!(ds.dev.utterance_count(), 5);
        assert_eq!(ds.test.utterance_count(), 5);
    }

    #[test]
    fn test_bad_utterance_leaves_fresh_dataset_empty() {
        let mut ds = OverlapDataset::new(params()).unwrap();
        let mut p = pool(12);
        p.features[7][0].push(1.0);

        let err = ds.load(p).unwrap_err();
        assert!(matches!(err, DataError::FeatureDimMismatch { index: 7, frame: 0, .. }));
        assert!(ds.subsets().iter().all(|(_, s)| s.is_empty()));
        assert_eq!(ds.split().total(), 0);
    }

    #[test]
    fn test_bad_params_rejected() {
        let p = PipelineParams { utt_out_dim: 0, ..params() };
        assert!(OverlapDataset::new(p).is_err());
    }
}
