// ============================================================
// Layer 3: Core Traits
// ============================================================
// The batching pipeline never reads files itself. Anything that
// can hand over two parallel ragged arrays implements PoolSource,
// and the application layer only sees the trait.
//
// Implementations:
//   - JsonPoolLoader -> pool serialised as JSON
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::utterance::RawPool;

// ─── PoolSource ───────────────────────────────────────────────────────────────
/// Any component that can produce a ragged (features, labels) pool.
pub trait PoolSource {
    /// Load the whole pool into memory.
    fn load_pool(&self) -> Result<RawPool>;
}
