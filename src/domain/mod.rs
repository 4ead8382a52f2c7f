// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs and traits describing the raw material of
// overlap detection: ragged utterances and where they come from.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only data shapes and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Ragged utterance pool (features + frame labels)
pub mod utterance;

// Core abstractions implemented by the data layer
pub mod traits;
