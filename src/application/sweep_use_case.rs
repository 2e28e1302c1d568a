// ============================================================
// Layer 2 - SweepUseCase
// ============================================================
// Repeats independent training runs for one or more noise levels.
//
// Output layout for noise level k (group = first_group + k):
//
//   {output_root}/group{g}/parameters.txt
//   {output_root}/group{g}/exp01/model.mpk.gz
//   {output_root}/group{g}/exp01/train_result.txt
//   {output_root}/group{g}/exp01/val_result.txt
//   {output_root}/group{g}/exp02/...
//
// Runs are sequential; the first failing run stops the sweep.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::train_use_case::{RunPaths, TrainConfig, TrainUseCase};

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub output_root:  PathBuf,
    /// Group index of the first noise level
    pub first_group:  usize,
    pub noise_levels: Vec<i32>,
    /// Repeats per noise level
    pub runs:         usize,
    /// Template for every run; noise level and seed are set per run
    pub train:        TrainConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            output_root:  PathBuf::from("result/result_cu_noisy"),
            first_group:  2,
            noise_levels: vec![-1],
            runs:         5,
            train:        TrainConfig::default(),
        }
    }
}

/// Paths for run `run` (1-based) of group `group`.
pub fn run_paths(output_root: &Path, group: usize, run: usize) -> RunPaths {
    let group_dir = output_root.join(format!("group{group}"));
    let exp_dir   = group_dir.join(format!("exp{run:02}"));
    RunPaths {
        model_path:        exp_dir.join("model"),
        train_result_path: exp_dir.join("train_result.txt"),
        val_result_path:   exp_dir.join("val_result.txt"),
        hyperparam_path:   group_dir.join("parameters.txt"),
    }
}

pub struct SweepUseCase {
    config: SweepConfig,
}

impl SweepUseCase {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Every (group, run, config, paths) the sweep will execute, in order.
    pub fn plan(&self) -> Vec<(usize, usize, TrainConfig, RunPaths)> {
        let cfg = &self.config;
        cfg.noise_levels
            .iter()
            .enumerate()
            .flat_map(|(k, &snr)| {
                let group = cfg.first_group + k;
                (1..=cfg.runs).map(move |run| {
                    let train = TrainConfig {
                        noise_level: snr,
                        seed:        cfg.train.seed.wrapping_add(run as u64 - 1),
                        ..cfg.train.clone()
                    };
                    (group, run, train, run_paths(&cfg.output_root, group, run))
                })
            })
            .collect()
    }

    pub fn execute(&self) -> Result<()> {
        let plan  = self.plan();
        let total = plan.len();

        for (i, (group, run, train, paths)) in plan.into_iter().enumerate() {
            tracing::info!(
                "Run {}/{}: group {} exp{:02} at {} dB",
                i + 1, total, group, run, train.noise_level
            );
            TrainUseCase::new(train, paths)
                .execute()
                .with_context(|| format!("Sweep run group{group}/exp{run:02} failed"))?;
        }

        tracing::info!("Sweep complete: {} runs", total);
        Ok(())
    }
}
