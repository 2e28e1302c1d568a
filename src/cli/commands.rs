// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `sweep`, and their
// flags. Hyperparameter flags are shared through `HyperArgs`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    sweep_use_case::SweepConfig,
    train_use_case::{RunPaths, TrainConfig},
};
use crate::domain::task::TaskMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train one model and write its checkpoint and result curves
    Train(TrainArgs),

    /// Repeat training runs over one or more noise levels
    Sweep(SweepArgs),
}

/// Settings shared by `train` and `sweep`.
#[derive(Args, Debug, Clone)]
pub struct HyperArgs {
    /// Root of the dataset tree: <data-root>/<snr>db/{train,val}/
    #[arg(long, default_value = "data/cu_data_noisy")]
    pub data_root: PathBuf,

    /// Which label column to train on: fd, loc or dia
    #[arg(long, default_value = "fd")]
    pub task: TaskMode,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 1e-5)]
    pub lr: f64,

    /// Number of full passes over the training set
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    #[arg(long, default_value_t = 10)]
    pub num_classes: usize,

    /// Channels of the first residual stage (doubles per stage)
    #[arg(long, default_value_t = 64)]
    pub base_width: usize,

    /// Seed for weight init and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl HyperArgs {
    fn into_config(self, noise_level: i32) -> TrainConfig {
        TrainConfig {
            data_root:   self.data_root,
            noise_level,
            task:        self.task,
            batch_size:  self.batch_size,
            lr:          self.lr,
            epochs:      self.epochs,
            num_classes: self.num_classes,
            base_width:  self.base_width,
            seed:        self.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Checkpoint path (written as <path>.mpk.gz)
    #[arg(long)]
    pub model_path: PathBuf,

    /// Training loss / accuracy curve output
    #[arg(long)]
    pub train_result: PathBuf,

    /// Validation loss / accuracy curve output
    #[arg(long)]
    pub val_result: PathBuf,

    /// Hyperparameter record output
    #[arg(long)]
    pub hyperparams: PathBuf,

    /// Signal-to-noise ratio of the dataset, in dB
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub noise_level: i32,

    #[command(flatten)]
    pub hyper: HyperArgs,
}

impl TrainArgs {
    /// Split into the application-layer config and output paths.
    pub fn into_run(self) -> (TrainConfig, RunPaths) {
        let paths = RunPaths {
            model_path:        self.model_path,
            train_result_path: self.train_result,
            val_result_path:   self.val_result,
            hyperparam_path:   self.hyperparams,
        };
        (self.hyper.into_config(self.noise_level), paths)
    }
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[arg(long, default_value = "result/result_cu_noisy")]
    pub output_root: PathBuf,

    /// Group index of the first noise level
    #[arg(long, default_value_t = 2)]
    pub group: usize,

    /// Comma-separated noise levels in dB, one group each
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "-1",
        allow_negative_numbers = true
    )]
    pub noise_levels: Vec<i32>,

    /// Independent runs per noise level
    #[arg(long, default_value_t = 5)]
    pub runs: usize,

    #[command(flatten)]
    pub hyper: HyperArgs,
}

impl From<SweepArgs> for SweepConfig {
    fn from(a: SweepArgs) -> Self {
        let train = a.hyper.into_config(a.noise_levels.first().copied().unwrap_or(-1));
        SweepConfig {
            output_root:  a.output_root,
            first_group:  a.group,
            noise_levels: a.noise_levels,
            runs:         a.runs,
            train,
        }
    }
}
