// ============================================================
// Layer 3: Utterance Pool
// ============================================================
// A pool is two parallel ragged arrays:
//
//   features[i] : frames x utt_in_dim    (one filterbank vector per frame)
//   labels[i]   : frames                 (one class per frame)
//
// The number of frames differs from utterance to utterance; the
// feature dimension is fixed for the whole pool. Nothing here
// enforces the pairing: Subset::load checks it before padding.

use serde::{Deserialize, Serialize};

/// One utterance's features, frame-major.
pub type FeatureMatrix = Vec<Vec<f32>>;

/// One utterance's per-frame class labels.
pub type LabelSequence = Vec<u32>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPool {
    pub features: Vec<FeatureMatrix>,
    pub labels: Vec<LabelSequence>,
}

impl RawPool {
    pub fn new(features: Vec<FeatureMatrix>, labels: Vec<LabelSequence>) -> Self {
        Self { features, labels }
    }

    /// Number of utterances, counted on the feature side.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total number of real (unpadded) frames in the pool
    pub fn total_frames(&self) -> usize {
        self.features.iter().map(|m| m.len()).sum()
    }

    /// Consume the pool into (features, labels) pairs.
    /// Extra entries on the longer side are dropped, so callers
    /// that care about a count mismatch must check it first.
    pub fn into_pairs(self) -> Vec<(FeatureMatrix, LabelSequence)> {
        self.features.into_iter().zip(self.labels).collect()
    }

    /// Rebuild a pool from (features, labels) pairs.
    pub fn from_pairs(pairs: Vec<(FeatureMatrix, LabelSequence)>) -> Self {
        let (features, labels) = pairs.into_iter().unzip();
        Self { features, labels }
    }

    pub fn into_parts(self) -> (Vec<FeatureMatrix>, Vec<LabelSequence>) {
        (self.features, self.labels)
    }
}
