// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between a ragged utterance pool and dense,
// model-ready batches.
//
//   pool file
//       │
//       ▼
//   JsonPoolLoader    → reads the ragged (features, labels) pool
//       │
//       ▼
//   SplitPlan         → shuffles once, cuts 50 / 25 / 25
//       │
//       ▼
//   Subset::load      → sort by length, chunk, pad per chunk
//       │
//       ▼
//   EpochView         → order in which chunks are served this epoch
//       │
//       ▼
//   OverlapBatch      → padded features + one-hot targets
//       │
//       ▼
//   FrameBatcher      → burn tensors on a device
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads and writes pool files
pub mod loader;

/// Typed errors for the pipeline
pub mod error;

/// Shared configuration bound to every subset
pub mod params;

/// Stable length sort and contiguous chunking
pub mod chunker;

/// Per-chunk zero padding
pub mod padding;

/// Epoch permutation over chunks
pub mod epoch;

/// One-hot batches and burn tensor conversion
pub mod batcher;

/// The length-bucketed batch sequence
pub mod subset;

/// Pool shuffle and 50/25/25 split
pub mod splitter;

/// Owns the train, dev and test subsets
pub mod dataset;
