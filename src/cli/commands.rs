// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `synth` and `prepare`, and all
// their flags. Flag names follow the pipeline parameter names
// (batch-size, utt-in-dim, utt-out-dim, utt-pad-lab, ...).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::prepare_use_case::PrepareConfig;
use crate::application::synth_use_case::SynthConfig;
use crate::data::params::PipelineParams;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a synthetic ragged utterance pool
    Synth(SynthArgs),

    /// Split, bucket and pad a pool, then serve batches for N epochs
    Prepare(PrepareArgs),
}

/// All arguments for the `synth` command
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Output pool file (JSON)
    #[arg(long, default_value = "data/pool.json")]
    pub out: String,

    /// Number of utterances
    #[arg(long, default_value_t = 200)]
    pub count: usize,

    /// Shortest utterance, in frames
    #[arg(long, default_value_t = 50)]
    pub min_len: usize,

    /// Longest utterance, in frames
    #[arg(long, default_value_t = 400)]
    pub max_len: usize,

    /// Feature values per frame
    #[arg(long, default_value_t = 40)]
    pub utt_in_dim: usize,

    /// Number of frame classes
    #[arg(long, default_value_t = 2)]
    pub utt_out_dim: usize,

    /// Fix the generator for a reproducible pool
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<SynthArgs> for SynthConfig {
    fn from(a: SynthArgs) -> Self {
        SynthConfig {
            out:         a.out,
            count:       a.count,
            min_len:     a.min_len,
            max_len:     a.max_len,
            utt_in_dim:  a.utt_in_dim,
            utt_out_dim: a.utt_out_dim,
            seed:        a.seed,
        }
    }
}

/// All arguments for the `prepare` command
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Pool file written by `synth` or an external exporter
    #[arg(long, default_value = "data/pool.json")]
    pub pool_file: String,

    /// Directory for metrics.csv and manifest.json
    #[arg(long, default_value = "runs")]
    pub out_dir: String,

    /// Number of passes over every subset
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Utterances per batch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Feature values per frame
    #[arg(long, default_value_t = 40)]
    pub utt_in_dim: usize,

    /// Number of output classes (one-hot width)
    #[arg(long, default_value_t = 2)]
    pub utt_out_dim: usize,

    /// Label assigned to padded frames
    #[arg(long, default_value_t = 0)]
    pub utt_pad_lab: u32,

    /// Non-zero for a down-sampling/up-sampling network:
    /// batch lengths are rounded to a multiple of 2^layer-num
    #[arg(long, default_value_t = 0)]
    pub down_up_num: u32,

    /// Network depth, required with --down-up-num
    #[arg(long)]
    pub layer_num: Option<u32>,

    /// Fix every shuffle; omitted means a different split each run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            pool_file: a.pool_file,
            out_dir:   a.out_dir,
            epochs:    a.epochs,
            params: PipelineParams {
                batch_size:  a.batch_size,
                utt_in_dim:  a.utt_in_dim,
                utt_out_dim: a.utt_out_dim,
                utt_pad_lab: a.utt_pad_lab,
                down_up_num: a.down_up_num,
                layer_num:   a.layer_num,
                seed:        a.seed,
            },
        }
    }
}
