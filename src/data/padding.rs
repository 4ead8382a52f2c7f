// ============================================================
// Layer 4: Bucketed Padding
// ============================================================
// Turns one chunk of ragged utterances into two dense buffers:
//
//   features : [utt_num, padded_len, utt_in_dim]   filled with 0.0
//   labels   : [utt_num, padded_len]               filled with pad label
//
// and copies each utterance's real frames into the front of its
// row. Frames past an utterance's own length keep the fill value.
//
// padded_len is chosen per chunk:
//   LongestInChunk -> the chunk's longest utterance
//   MultipleOf(s)  -> that length rounded up to a multiple of s,
//                     so a down/up-sampling network sees lengths
//                     divisible by its total stride
//
// Rounding is integer ceiling division: ceil(len / s) * s.
//
// Reference: Rust Book §8 (Vectors), std::slice::copy_from_slice

use crate::domain::utterance::{FeatureMatrix, LabelSequence};

/// How a chunk's padded length is derived from its longest utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadTarget {
    LongestInChunk,
    MultipleOf(usize),
}

impl PadTarget {
    pub fn target_length(&self, max_len: usize) -> usize {
        match *self {
            PadTarget::LongestInChunk => max_len,
            PadTarget::MultipleOf(step) => max_len.div_ceil(step) * step,
        }
    }
}

// ─── PaddedChunk ──────────────────────────────────────────────────────────────
/// A dense, immutable batch built from one chunk of sorted utterances.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedChunk {
    /// Positional identifiers of the utterances, in row order
    ids: Vec<String>,
    /// Real frame count of each row
    lengths: Vec<usize>,
    padded_len: usize,
    feature_dim: usize,
    /// Row-major [utt_num, padded_len, feature_dim]
    features: Vec<f32>,
    /// Row-major [utt_num, padded_len]
    labels: Vec<u32>,
}

impl PaddedChunk {
    /// Pad one chunk. Inputs are assumed validated: every feature
    /// frame has `feature_dim` values and every label sequence is as
    /// long as its feature matrix.
    pub fn build(
        ids: Vec<String>,
        features: &[FeatureMatrix],
        labels: &[LabelSequence],
        feature_dim: usize,
        pad_label: u32,
        target: PadTarget,
    ) -> Self {
        let lengths: Vec<usize> = features.iter().map(|m| m.len()).collect();
        // chunks come from length-sorted input, but take the max anyway
        let max_len = lengths.iter().copied().max().unwrap_or(0);
        let padded_len = target.target_length(max_len);
        let utt_num = features.len();

        let mut feat_buf = vec![0.0f32; utt_num * padded_len * feature_dim];
        let mut lab_buf = vec![pad_label; utt_num * padded_len];

        for (u, (matrix, labs)) in features.iter().zip(labels).enumerate() {
            let row = u * padded_len;
            for (t, frame) in matrix.iter().enumerate() {
                let at = (row + t) * feature_dim;
                feat_buf[at..at + feature_dim].copy_from_slice(frame);
            }
            lab_buf[row..row + labs.len()].copy_from_slice(labs);
        }

        Self {
            ids,
            lengths,
            padded_len,
            feature_dim,
            features: feat_buf,
            labels: lab_buf,
        }
    }

    pub fn utt_num(&self) -> usize {
        self.lengths.len()
    }

    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    /// (utt_num, padded_len, feature_dim)
    pub fn shape(&self) -> [usize; 3] {
        [self.utt_num(), self.padded_len, self.feature_dim]
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn features(&self) -> &[f32] {
        &self.features
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// One utterance's padded features, [padded_len * feature_dim].
    pub fn feature_row(&self, u: usize) -> &[f32] {
        let width = self.padded_len * self.feature_dim;
        &self.features[u * width..(u + 1) * width]
    }

    /// One utterance's padded labels, [padded_len].
    pub fn label_row(&self, u: usize) -> &[u32] {
        &self.labels[u * self.padded_len..(u + 1) * self.padded_len]
    }

    /// Frames that carry real data
    pub fn real_frames(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Frames allocated, real or not
    pub fn padded_frames(&self) -> usize {
        self.utt_num() * self.padded_len
    }

    /// Share of allocated frames that are padding, in [0, 1].
    pub fn padding_ratio(&self) -> f64 {
        let padded = self.padded_frames();
        if padded == 0 {
            return 0.0;
        }
        1.0 - self.real_frames() as f64 / padded as f64
    }
}
