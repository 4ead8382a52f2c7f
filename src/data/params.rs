// ============================================================
// Layer 4: Pipeline Parameters
// ============================================================
// The shared configuration a Dataset forwards to each of its
// three Subsets. Validation happens here, at binding time, so
// an inconsistent parameter set never reaches the padding code.
//
// Defaults follow the overlap-detection recipe:
//   batch_size 32, 40-dim filterbank frames, 2 output classes,
//   pad label 0, no down/up-sampling.

use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::padding::PadTarget;

/// Largest accepted layer_num (stride of 2^31 frames)
pub const MAX_LAYER_NUM: u32 = 31;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Utterances per chunk (the last chunk may hold fewer)
    pub batch_size: usize,

    /// Feature values per frame
    pub utt_in_dim: usize,

    /// Number of classes for the one-hot targets
    pub utt_out_dim: usize,

    /// Label written into padded frames
    pub utt_pad_lab: u32,

    /// 0 disables length rounding; any other value rounds every
    /// chunk length up to a multiple of 2^layer_num
    pub down_up_num: u32,

    /// Network depth behind the rounding stride. Required when
    /// down_up_num != 0.
    pub layer_num: Option<u32>,

    /// Fixes every shuffle in the pipeline. None draws from OS
    /// entropy, so two runs will not produce the same split.
    pub seed: Option<u64>,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            batch_size: 32,
            utt_in_dim: 40,
            utt_out_dim: 2,
            utt_pad_lab: 0,
            down_up_num: 0,
            layer_num: None,
            seed: None,
        }
    }
}

impl PipelineParams {
    /// Check that this parameter set can be bound to a Subset.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.utt_in_dim == 0 {
            return Err(DataError::InvalidConfig("utt_in_dim must be at least 1".into()));
        }
        if self.utt_out_dim == 0 {
            return Err(DataError::InvalidConfig("utt_out_dim must be at least 1".into()));
        }
        if self.utt_pad_lab as usize >= self.utt_out_dim {
            return Err(DataError::InvalidConfig(format!(
                "utt_pad_lab {} cannot be one-hot encoded with utt_out_dim {}",
                self.utt_pad_lab, self.utt_out_dim
            )));
        }
        self.pad_target().map(|_| ())
    }

    /// Resolve how each chunk picks its padded length.
    pub fn pad_target(&self) -> Result<PadTarget, DataError> {
        if self.down_up_num == 0 {
            return Ok(PadTarget::LongestInChunk);
        }

        let depth = self.layer_num.ok_or_else(|| {
            DataError::InvalidConfig(format!(
                "down_up_num = {} requires layer_num (network depth)",
                self.down_up_num
            ))
        })?;

        if depth > MAX_LAYER_NUM {
            return Err(DataError::InvalidConfig(format!(
                "layer_num {depth} exceeds the maximum of {MAX_LAYER_NUM}"
            )));
        }

        Ok(PadTarget::MultipleOf(1usize << depth))
    }
}
