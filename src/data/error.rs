// ============================================================
// Layer 4: Pipeline Errors
// ============================================================
// Every failure the batching pipeline can report. All of them
// are raised while binding configuration or inside
// Subset::load, never while retrieving a batch.
//
//   Precondition violations  -> caller handed us inconsistent
//                               ragged arrays
//   Invalid configuration    -> the parameter set cannot be
//                               bound to a subset at all
//
// An empty pool is NOT an error: it yields zero chunks.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("feature/label count mismatch: {features} feature matrices but {labels} label sequences")]
    SampleCountMismatch { features: usize, labels: usize },

    #[error("utterance {index}: {frames} feature frames but {labels} labels")]
    LengthMismatch {
        index: usize,
        frames: usize,
        labels: usize,
    },

    #[error("utterance {index}, frame {frame}: expected {expected} features, got {got}")]
    FeatureDimMismatch {
        index: usize,
        frame: usize,
        expected: usize,
        got: usize,
    },

    #[error("utterance {index}, frame {frame}: label {label} is outside 0..{classes}")]
    LabelOutOfRange {
        index: usize,
        frame: usize,
        label: u32,
        classes: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DataError {
    /// True for the caller-error family (bad ragged input).
    pub fn is_precondition(&self) -> bool {
        !matches!(self, DataError::InvalidConfig(_))
    }
}
