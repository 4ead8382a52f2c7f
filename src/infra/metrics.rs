// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Records per-epoch batch statistics to a CSV file, one row per
// (epoch, subset).
//
// Columns:
//   - epoch:         1, 2, 3, ...
//   - subset:        train / dev / test
//   - batches:       batches served this epoch
//   - real_frames:   frames carrying real data
//   - padded_frames: frames allocated across all batches
//   - padding_ratio: 1 - real / padded (lower is better)
//
// Output file: <out_dir>/metrics.csv
//
// Example:
//   epoch,subset,batches,real_frames,padded_frames,padding_ratio
//   1,train,16,51230,52864,0.030910
//   1,dev,8,25511,26304,0.030147

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub subset: String,
    pub batches: usize,
    pub real_frames: usize,
    pub padded_frames: usize,
}

impl EpochMetrics {
    pub fn new(epoch: usize, subset: impl Into<String>) -> Self {
        Self {
            epoch,
            subset: subset.into(),
            batches: 0,
            real_frames: 0,
            padded_frames: 0,
        }
    }

    /// Account for one served batch.
    pub fn record(&mut self, real_frames: usize, padded_frames: usize) {
        self.batches += 1;
        self.real_frames += real_frames;
        self.padded_frames += padded_frames;
    }

    pub fn padding_ratio(&self) -> f64 {
        if self.padded_frames == 0 {
            return 0.0;
        }
        1.0 - self.real_frames as f64 / self.padded_frames as f64
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the header if the file doesn't exist yet, so
    /// repeated runs append to one log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,subset,batches,real_frames,padded_frames,padding_ratio")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{:.6}",
            m.epoch,
            m.subset,
            m.batches,
            m.real_frames,
            m.padded_frames,
            m.padding_ratio(),
        )?;

        tracing::debug!(
            "Logged epoch {} {}: {} batches, padding {:.2}%",
            m.epoch,
            m.subset,
            m.batches,
            m.padding_ratio() * 100.0,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
