// ============================================================
// Layer 4: Overlap Batcher
// ============================================================
// Two forms of the same batch:
//
//   OverlapBatch   plain buffers, one-hot targets already expanded
//                  features [utt_num, padded_len, utt_in_dim]
//                  targets  [utt_num, padded_len, utt_out_dim]
//
//   FrameBatch<B>  the same data as burn tensors on a device
//
// FrameBatcher implements burn's Batcher trait. A DataLoader over a
// Subset usually hands it one chunk at a time; when it gets several,
// their rows are stacked and every row is re-padded to the widest
// chunk, with zero features and pad-label targets.
//
// The one-hot expansion mirrors a "to categorical" step: every
// integer label becomes a row with a single 1.0 at its class.
// Padded frames carry the pad label, so they get a one-hot row
// too; the `lengths` vector tells real frames from padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::padding::PaddedChunk;

/// Expand integer labels into one-hot rows of width `classes`.
/// Labels must already be < classes (Subset::load guarantees it).
pub fn to_categorical(labels: &[u32], classes: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; labels.len() * classes];
    for (i, &label) in labels.iter().enumerate() {
        out[i * classes + label as usize] = 1.0;
    }
    out
}

// ─── OverlapBatch ─────────────────────────────────────────────────────────────
/// One retrieved batch: padded features plus one-hot frame targets.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapBatch {
    /// Positional identifiers of the utterances, in row order
    pub ids: Vec<String>,

    /// Real frame count per row
    pub lengths: Vec<usize>,

    /// [utt_num, padded_len, utt_in_dim]
    pub shape: [usize; 3],

    /// utt_out_dim
    pub classes: usize,

    /// Label written into padded frames
    pub pad_label: u32,

    /// Row-major features, zero past each row's length
    pub features: Vec<f32>,

    /// Row-major one-hot targets [utt_num, padded_len, classes]
    pub targets: Vec<f32>,
}

impl OverlapBatch {
    pub fn from_chunk(chunk: &PaddedChunk, classes: usize, pad_label: u32) -> Self {
        Self {
            ids: chunk.ids().to_vec(),
            lengths: chunk.lengths().to_vec(),
            shape: chunk.shape(),
            classes,
            pad_label,
            features: chunk.features().to_vec(),
            targets: to_categorical(chunk.labels(), classes),
        }
    }

    pub fn padded_len(&self) -> usize {
        self.shape[1]
    }

    /// Argmax of the one-hot row for utterance `u`, frame `t`.
    pub fn target_class(&self, u: usize, t: usize) -> usize {
        let at = (u * self.padded_len() + t) * self.classes;
        let row = &self.targets[at..at + self.classes];
        row.iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (c, &v)| if v > best.1 { (c, v) } else { best })
            .0
    }
}

// ─── FrameBatch ───────────────────────────────────────────────────────────────
/// A batch ready for a burn model forward pass.
#[derive(Debug, Clone)]
pub struct FrameBatch<B: Backend> {
    /// shape: [utt_num, padded_len, utt_in_dim]
    pub features: Tensor<B, 3>,

    /// shape: [utt_num, padded_len, utt_out_dim]
    pub targets: Tensor<B, 3>,

    /// Real frame count per row, for masking losses and metrics
    pub lengths: Vec<usize>,
}

// ─── FrameBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors land on the right CPU/GPU.
#[derive(Clone, Debug)]
pub struct FrameBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FrameBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// Buffers are already dense and row-major, so a single chunk is a
// flat upload followed by a reshape.
impl<B: Backend> Batcher<OverlapBatch, FrameBatch<B>> for FrameBatcher<B> {
    fn batch(&self, items: Vec<OverlapBatch>) -> FrameBatch<B> {
        let padded_len = items.iter().map(|b| b.padded_len()).max().unwrap_or(0);
        let in_dim = items.first().map_or(0, |b| b.shape[2]);
        let classes = items.first().map_or(0, |b| b.classes);

        let mut features: Vec<f32> = Vec::new();
        let mut targets: Vec<f32> = Vec::new();
        let mut lengths: Vec<usize> = Vec::new();

        for item in &items {
            let [utt_num, len, _] = item.shape;
            let pad_row = to_categorical(&[item.pad_label], classes);

            for u in 0..utt_num {
                let f_at = u * len * in_dim;
                features.extend_from_slice(&item.features[f_at..f_at + len * in_dim]);
                features.resize(features.len() + (padded_len - len) * in_dim, 0.0);

                let t_at = u * len * classes;
                targets.extend_from_slice(&item.targets[t_at..t_at + len * classes]);
                for _ in len..padded_len {
                    targets.extend_from_slice(&pad_row);
                }
            }
            lengths.extend_from_slice(&item.lengths);
        }

        let utt_num = lengths.len();

        let features = Tensor::<B, 1>::from_floats(features.as_slice(), &self.device)
            .reshape([utt_num, padded_len, in_dim]);

        let targets = Tensor::<B, 1>::from_floats(targets.as_slice(), &self.device)
            .reshape([utt_num, padded_len, classes]);

        FrameBatch {
            features,
            targets,
            lengths,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::padding::PadTarget;
    use burn::backend::NdArray;

    fn sample_chunk() -> PaddedChunk {
        let feats = vec![
            vec![vec![1.0, 2.0]],
            vec![vec![3.0, 4.0], vec![5.0, 6.0], vec![7.0, 8.0]],
        ];
        let labs = vec![vec![1], vec![0, 2, 1]];
        PaddedChunk::build(
            vec!["4".into(), "9".into()],
            &feats,
            &labs,
            2,
            0,
            PadTarget::LongestInChunk,
        )
    }

    #[test]
    fn test_to_categorical() {
        let hot = to_categorical(&[0, 2, 1], 3);
        assert_eq!(hot, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_from_chunk_shapes() {
        let b = OverlapBatch::from_chunk(&sample_chunk(), 3, 0);
        assert_eq!(b.shape, [2, 3, 2]);
        assert_eq!(b.features.len(), 12);
        assert_eq!(b.targets.len(), 2 * 3 * 3);
        assert_eq!(b.lengths, vec![1, 3]);
    }

    #[test]
    fn test_target_class_decodes_labels() {
        let b = OverlapBatch::from_chunk(&sample_chunk(), 3, 0);
        assert_eq!(b.target_class(0, 0), 1);
        assert_eq!(b.target_class(1, 0), 0);
        assert_eq!(b.target_class(1, 1), 2);
        assert_eq!(b.target_class(1, 2), 1);
        // padded frames decode to the pad label
        assert_eq!(b.target_class(0, 1), 0);
        assert_eq!(b.target_class(0, 2), 0);
    }

    #[test]
    fn test_tensor_batch_on_ndarray() {
        let b = OverlapBatch::from_chunk(&sample_chunk(), 3, 0);
        let batcher = FrameBatcher::<NdArray>::new(Default::default());
        let fb = batcher.batch(vec![b.clone()]);

        assert_eq!(fb.features.dims(), [2, 3, 2]);
        assert_eq!(fb.targets.dims(), [2, 3, 3]);
        assert_eq!(fb.lengths, vec![1, 3]);

        let values = fb.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, b.features);

        // each frame's one-hot row sums to 1
        let sums = fb.targets.sum_dim(2).into_data().to_vec::<f32>().unwrap();
        assert!(sums.iter().all(|&s| (s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_batcher_stacks_chunks_to_widest() {
        let short = PaddedChunk::build(
            vec!["1".into()],
            &[vec![vec![1.0, 1.0]]],
            &[vec![2]],
            2,
            1,
            PadTarget::LongestInChunk,
        );
        let short = OverlapBatch::from_chunk(&short, 3, 1);
        let long = OverlapBatch::from_chunk(&sample_chunk(), 3, 0);

        let batcher = FrameBatcher::<NdArray>::new(Default::default());
        let fb = batcher.batch(vec![short, long.clone()]);

        assert_eq!(fb.features.dims(), [3, 3, 2]);
        assert_eq!(fb.targets.dims(), [3, 3, 3]);
        assert_eq!(fb.lengths, vec![1, 1, 3]);

        let values = fb.features.into_data().to_vec::<f32>().unwrap();
        // first row: one real frame, then two zero frames
        assert_eq!(&values[..6], &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        // rows from the wider chunk are copied unchanged
        assert_eq!(&values[6..], long.features.as_slice());

        let hot = fb.targets.into_data().to_vec::<f32>().unwrap();
        // real frame class 2, widened frames carry pad label 1
        assert_eq!(&hot[..9], &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&hot[9..], long.targets.as_slice());
    }
}
