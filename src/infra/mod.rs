// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to the pipeline:
//
//   metrics.rs   per-epoch padding statistics appended to a CSV
//                file for later analysis
//
//   manifest.rs  the bound parameters, split sizes and chunk
//                shapes of a run, saved as JSON so a training
//                run can be checked against it
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Per-epoch CSV metrics
pub mod metrics;

/// Run manifest persistence
pub mod manifest;
