// ============================================================
// Layer 4: Subset (length-bucketed batch sequence)
// ============================================================
// The core of the pipeline. Given a ragged pool it produces an
// indexable sequence of dense, shape-stable batches:
//
//   load()
//     ├── validate       counts, frame dims, label range
//     ├── sort           stable, ascending by frame count
//     ├── chunk          contiguous runs of batch_size
//     ├── pad            each chunk to its own padded length
//     └── on_epoch_end   first epoch view
//
//   batch(pos)           epoch view -> chunk -> one-hot batch
//   on_epoch_end()       new view (reshuffled if shuffle = true)
//
// Padding is eager: once load returns, the ragged input is gone
// and only the padded chunks remain. Retrieval is a read-only
// lookup and cannot fail for pos < len().

use burn::data::dataset::Dataset;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::batcher::OverlapBatch;
use crate::data::chunker::{permute, sort_by_length, Chunker};
use crate::data::epoch::EpochView;
use crate::data::error::DataError;
use crate::data::padding::{PadTarget, PaddedChunk};
use crate::data::params::PipelineParams;
use crate::domain::utterance::{FeatureMatrix, LabelSequence};

/// Aggregate padding figures for one subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsetStats {
    pub chunks: usize,
    pub utterances: usize,
    pub real_frames: usize,
    pub padded_frames: usize,
    pub padding_ratio: f64,
    /// Whether the epoch order is reshuffled at each boundary
    pub shuffled: bool,
}

/// Every check that can reject a pool, run before any padding.
/// Errors carry the utterance's position in `features`.
pub fn check_pool(
    features: &[FeatureMatrix],
    labels: &[LabelSequence],
    params: &PipelineParams,
) -> Result<(), DataError> {
    if features.len() != labels.len() {
        return Err(DataError::SampleCountMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }

    let dim = params.utt_in_dim;
    let classes = params.utt_out_dim;

    for (index, (matrix, labs)) in features.iter().zip(labels).enumerate() {
        if matrix.len() != labs.len() {
            return Err(DataError::LengthMismatch {
                index,
                frames: matrix.len(),
                labels: labs.len(),
            });
        }
        if let Some((frame, row)) = matrix.iter().enumerate().find(|&(_, row)| row.len() != dim) {
            return Err(DataError::FeatureDimMismatch {
                index,
                frame,
                expected: dim,
                got: row.len(),
            });
        }
        if let Some((frame, &label)) = labs.iter().enumerate().find(|&(_, &l)| l as usize >= classes) {
            return Err(DataError::LabelOutOfRange {
                index,
                frame,
                label,
                classes,
            });
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct Subset {
    params: PipelineParams,
    pad_target: PadTarget,
    chunks: Vec<PaddedChunk>,
    shuffle: bool,
    epoch: EpochView,
    rng: StdRng,
}

impl Subset {
    /// Bind parameters. Fails on an inconsistent parameter set, so
    /// nothing downstream has to re-check it.
    pub fn new(params: PipelineParams) -> Result<Self, DataError> {
        params.validate()?;
        let pad_target = params.pad_target()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            params,
            pad_target,
            chunks: Vec::new(),
            shuffle: false,
            epoch: EpochView::default(),
            rng,
        })
    }

    /// Sort, chunk and pad a ragged pool, then derive the first
    /// epoch view. Replaces anything loaded before.
    pub fn load(
        &mut self,
        features: Vec<FeatureMatrix>,
        labels: Vec<LabelSequence>,
        shuffle: bool,
    ) -> Result<(), DataError> {
        check_pool(&features, &labels, &self.params)?;

        let lengths: Vec<usize> = features.iter().map(|m| m.len()).collect();
        let ids: Vec<String> = (0..features.len()).map(|i| i.to_string()).collect();

        let order = sort_by_length(&lengths);
        let features = permute(features, &order);
        let labels = permute(labels, &order);
        let ids = permute(ids, &order);

        let chunker = Chunker::new(self.params.batch_size);
        self.chunks = chunker
            .ranges(features.len())
            .into_iter()
            .map(|r| {
                PaddedChunk::build(
                    ids[r.clone()].to_vec(),
                    &features[r.clone()],
                    &labels[r],
                    self.params.utt_in_dim,
                    self.params.utt_pad_lab,
                    self.pad_target,
                )
            })
            .collect();

        for (c, chunk) in self.chunks.iter().enumerate() {
            tracing::debug!(
                "chunk {}: shape {:?}, padding {:.1}%",
                c,
                chunk.shape(),
                chunk.padding_ratio() * 100.0
            );
        }

        if self.chunks.is_empty() {
            tracing::warn!("Subset loaded from an empty pool: no batches");
        }

        self.shuffle = shuffle;
        self.on_epoch_end();
        Ok(())
    }

    /// Start a new epoch: identity order, or a fresh random
    /// permutation when the subset was loaded with shuffle = true.
    pub fn on_epoch_end(&mut self) {
        let n = self.chunks.len();
        self.epoch = if self.shuffle {
            EpochView::shuffled(n, &mut self.rng)
        } else {
            EpochView::identity(n)
        };
    }

    /// Number of batches per epoch
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Batch at epoch position `pos`, with one-hot targets.
    /// None only when pos >= len().
    pub fn batch(&self, pos: usize) -> Option<OverlapBatch> {
        let chunk = self.chunk_at(pos)?;
        Some(OverlapBatch::from_chunk(
            chunk,
            self.params.utt_out_dim,
            self.params.utt_pad_lab,
        ))
    }

    /// The padded chunk behind epoch position `pos`.
    pub fn chunk_at(&self, pos: usize) -> Option<&PaddedChunk> {
        let physical = self.epoch.resolve(pos)?;
        self.chunks.get(physical)
    }

    /// Chunks in physical (length-sorted) order.
    pub fn chunks(&self) -> &[PaddedChunk] {
        &self.chunks
    }

    pub fn epoch(&self) -> &EpochView {
        &self.epoch
    }

    pub fn shuffles(&self) -> bool {
        self.shuffle
    }

    pub fn utterance_count(&self) -> usize {
        self.chunks.iter().map(|c| c.utt_num()).sum()
    }

    pub fn stats(&self) -> SubsetStats {
        let real_frames: usize = self.chunks.iter().map(|c| c.real_frames()).sum();
        let padded_frames: usize = self.chunks.iter().map(|c| c.padded_frames()).sum();
        let padding_ratio = if padded_frames == 0 {
            0.0
        } else {
            1.0 - real_frames as f64 / padded_frames as f64
        };
        SubsetStats {
            chunks: self.chunks.len(),
            utterances: self.utterance_count(),
            real_frames,
            padded_frames,
            padding_ratio,
            shuffled: self.shuffles(),
        }
    }
}

// ─── Burn Dataset Trait Implementation ────────────────────────────────────────
// Lets burn tooling walk the subset one batch at a time, in the
// current epoch order.
impl Dataset<OverlapBatch> for Subset {
    fn get(&self, index: usize) -> Option<OverlapBatch> {
        self.batch(index)
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }
}
