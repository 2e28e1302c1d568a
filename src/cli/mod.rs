// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `train` - one run with explicit output paths
//   2. `sweep` - repeated runs under result/.../group*/exp*/
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, SweepArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "fault-diag",
    version = "0.1.0",
    about = "Train a 1-D ResNet fault classifier on noisy vibration signals."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Sweep(args) => run_sweep(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let (config, paths) = args.into_run();
    tracing::info!("Starting training on {} dB data under '{}'", config.noise_level, config.data_root.display());

    let history = TrainUseCase::new(config, paths).execute()?;

    println!("Training complete. {} epochs recorded.", history.len());
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    use crate::application::sweep_use_case::SweepUseCase;

    let use_case = SweepUseCase::new(args.into());
    use_case.execute()?;

    println!("Sweep complete.");
    Ok(())
}
