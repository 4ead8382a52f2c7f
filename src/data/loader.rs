// ============================================================
// Layer 4: Pool Loader
// ============================================================
// Reads a ragged utterance pool from a JSON file:
//
//   {
//     "features": [ [[f32; utt_in_dim]; frames_0], [[...]; frames_1], ... ],
//     "labels":   [ [u32; frames_0],               [u32; frames_1],    ... ]
//   }
//
// The loader only parses. Shape checks (matching counts, frame
// dims, label range) belong to Subset::load, which reports them
// as typed DataErrors before any padding happens.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use crate::domain::traits::PoolSource;
use crate::domain::utterance::RawPool;

/// Loads a pool serialised as JSON.
pub struct JsonPoolLoader {
    path: PathBuf,
}

impl JsonPoolLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write a pool to this loader's path, creating parent dirs.
    pub fn save(&self, pool: &RawPool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create '{}'", parent.display()))?;
            }
        }

        let file = fs::File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, pool)
            .with_context(|| format!("Cannot write pool to '{}'", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Cannot flush pool to '{}'", self.path.display()))?;

        tracing::debug!("Saved pool of {} utterances to '{}'", pool.len(), self.path.display());
        Ok(())
    }
}

impl PoolSource for JsonPoolLoader {
    fn load_pool(&self) -> Result<RawPool> {
        let file = fs::File::open(&self.path).with_context(|| {
            format!(
                "Cannot open pool file '{}'. Run 'synth' to create one.",
                self.path.display()
            )
        })?;

        let pool: RawPool = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed pool file '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} utterances ({} frames) from '{}'",
            pool.len(),
            pool.total_frames(),
            self.path.display()
        );
        Ok(pool)
    }
}
