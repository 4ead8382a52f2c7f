// ============================================================
// Layer 2: PrepareUseCase
// ============================================================
// Runs the batching pipeline end to end, the way a training
// loop would drive it:
//
//   Step 1: Load the ragged pool          (Layer 4 - data)
//   Step 2: Split + bucket + pad          (Layer 4 - data)
//   Step 3: Save the run manifest         (Layer 6 - infra)
//   Step 4: For each epoch, serve every batch of every subset
//           as burn tensors and log padding metrics
//           (Layer 4 - data, Layer 6 - infra)
//   Step 5: Epoch boundary: re-derive every epoch view
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::{ensure, Result};
use burn::data::dataloader::batcher::Batcher;
use serde::{Deserialize, Serialize};

use crate::data::batcher::FrameBatcher;
use crate::data::dataset::OverlapDataset;
use crate::data::loader::JsonPoolLoader;
use crate::data::params::PipelineParams;
use crate::domain::traits::PoolSource;
use crate::domain::utterance::RawPool;
use crate::infra::manifest::{ManifestStore, RunManifest};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};

type PrepareBackend = burn::backend::NdArray;

// ─── Prepare Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub pool_file: String,
    pub out_dir: String,
    pub epochs: usize,
    pub params: PipelineParams,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            pool_file: "data/pool.json".to_string(),
            out_dir: "runs".to_string(),
            epochs: 1,
            params: PipelineParams::default(),
        }
    }
}

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline; returns every metrics row written.
    pub fn execute(&self) -> Result<Vec<EpochMetrics>> {
        let cfg = &self.config;

        // ── Step 1: Load the pool ─────────────────────────────────────────────
        let pool = JsonPoolLoader::new(&cfg.pool_file).load_pool()?;
        self.run(pool)
    }

    /// Steps 2-5 on an in-memory pool.
    pub fn run(&self, pool: RawPool) -> Result<Vec<EpochMetrics>> {
        let cfg = &self.config;
        ensure!(cfg.epochs > 0, "epochs must be at least 1");

        // ── Step 2: Split, sort, chunk, pad ───────────────────────────────────
        // Parameter problems surface here, before the pool is touched
        let mut dataset = OverlapDataset::new(cfg.params.clone())?;
        dataset.load(pool)?;

        for (name, subset) in dataset.subsets() {
            let st = subset.stats();
            tracing::info!(
                "{:<5} {} utterances in {} batches, padding {:.2}%",
                name,
                st.utterances,
                st.chunks,
                st.padding_ratio * 100.0
            );
        }

        // ── Step 3: Save the manifest ─────────────────────────────────────────
        ManifestStore::new(&cfg.out_dir).save(&RunManifest::from_dataset(&dataset))?;

        // ── Step 4: Epoch loop ────────────────────────────────────────────────
        let logger = MetricsLogger::new(&cfg.out_dir)?;
        let batcher = FrameBatcher::<PrepareBackend>::new(Default::default());
        let mut rows = Vec::with_capacity(cfg.epochs * 3);

        for epoch in 1..=cfg.epochs {
            for (name, subset) in dataset.subsets() {
                let mut m = EpochMetrics::new(epoch, name);

                for pos in 0..subset.len() {
                    let Some(batch) = subset.batch(pos) else {
                        break;
                    };
                    let real_frames: usize = batch.lengths.iter().sum();
                    let tensors = batcher.batch(vec![batch]);
                    let [utt_num, padded_len, _] = tensors.features.dims();
                    m.record(real_frames, utt_num * padded_len);
                }

                logger.log(&m)?;
                rows.push(m);
            }

            tracing::info!(
                "Epoch {:>3}/{} served, train order {:?}",
                epoch,
                cfg.epochs,
                dataset.train.epoch().as_slice()
            );

            // ── Step 5: Epoch boundary ────────────────────────────────────────
            dataset.on_epoch_end();
        }

        tracing::info!("Metrics written to '{}'", logger.csv_path().display());
        Ok(rows)
    }
}
