// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No padding or shuffling logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

// Synthetic pool generation
pub mod synth_use_case;

// Split, bucket, pad and serve batches for N epochs
pub mod prepare_use_case;
