// ============================================================
// Layer 6: Run Manifest
// ============================================================
// Saves what a run was built from and what it produced, so a
// later training run can be checked against it:
//
//   <out_dir>/manifest.json
//     params        the bound PipelineParams
//     split_sizes   train / dev / test utterance counts
//     subsets       per-subset padding stats and chunk shapes
//
// The split itself is only reproducible when params.seed is set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::data::dataset::OverlapDataset;
use crate::data::params::PipelineParams;
use crate::data::subset::SubsetStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetEntry {
    pub name: String,
    pub stats: SubsetStats,
    /// [utt_num, padded_len, utt_in_dim] per chunk, physical order
    pub chunk_shapes: Vec<[usize; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub params: PipelineParams,
    pub split_sizes: [usize; 3],
    pub subsets: Vec<SubsetEntry>,
}

impl RunManifest {
    pub fn from_dataset(ds: &OverlapDataset) -> Self {
        let split = ds.split();
        let subsets = ds
            .subsets()
            .iter()
            .map(|(name, subset)| SubsetEntry {
                name: name.to_string(),
                stats: subset.stats(),
                chunk_shapes: subset.chunks().iter().map(|c| c.shape()).collect(),
            })
            .collect();

        Self {
            params: ds.params().clone(),
            split_sizes: [split.train.len(), split.dev.len(), split.test.len()],
            subsets,
        }
    }
}

/// Reads and writes manifest.json in a run directory.
pub struct ManifestStore {
    dir: PathBuf,
}

impl ManifestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(&self, manifest: &RunManifest) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join("manifest.json");
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved run manifest to '{}'", path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<RunManifest> {
        let path = self.dir.join("manifest.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
