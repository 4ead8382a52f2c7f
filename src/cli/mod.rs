// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All work is delegated to Layer 2 (application).
//
//   1. `synth`   writes a synthetic utterance pool
//   2. `prepare` splits, buckets and pads a pool and serves its
//                batches for a number of epochs
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, SynthArgs};

#[derive(Parser, Debug)]
#[command(
    name = "overlap-batcher",
    version = "0.1.0",
    about = "Length-bucketed, zero-padded batches for speech-overlap detection."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case. No pipeline logic here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Synth(args)   => Self::run_synth(args),
            Commands::Prepare(args) => Self::run_prepare(args),
        }
    }

    fn run_synth(args: SynthArgs) -> Result<()> {
        use crate::application::synth_use_case::SynthUseCase;

        let out  = args.out.clone();
        let pool = SynthUseCase::new(args.into()).execute()?;

        println!("Wrote {} utterances to {}", pool.len(), out);
        Ok(())
    }

    fn run_prepare(args: PrepareArgs) -> Result<()> {
        use crate::application::prepare_use_case::PrepareUseCase;

        tracing::info!("Preparing batches from: {}", args.pool_file);

        let out_dir = args.out_dir.clone();
        let rows    = PrepareUseCase::new(args.into()).execute()?;

        for m in &rows {
            println!(
                "Epoch {:>3} | {:<5} | batches={:>4} | padding={:.2}%",
                m.epoch,
                m.subset,
                m.batches,
                m.padding_ratio() * 100.0,
            );
        }
        println!("Done. Metrics and manifest saved in {}", out_dir);
        Ok(())
    }
}
