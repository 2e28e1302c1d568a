// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// One complete training run, in order:
//
//   Step 1: Validate the configuration
//   Step 2: Save hyperparameters       (Layer 6 - infra)
//   Step 3: Load train / val datasets  (Layer 4 - data)
//           and check labels are class ids
//   Step 4: Run the epoch loop         (Layer 5 - ml)
//   Step 5: Write result curves        (Layer 6 - infra)
//
// The device is injected: `execute` runs on the default WGPU
// device, `execute_on` on any Burn AutodiffBackend.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use burn::tensor::backend::AutodiffBackend;

use crate::data::dataset::FaultDataset;
use crate::domain::task::TaskMode;
use crate::infra::{
    checkpoint::{write_hyperparameters, CheckpointManager, HyperParameters},
    metrics::MetricHistory,
};
use crate::ml::trainer::{run_training, TrainBackend};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything that shapes a run apart from its output paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Root of the noisy dataset tree: {data_root}/{snr}db/{train,val}/
    pub data_root:   PathBuf,
    /// Signal-to-noise ratio of the dataset, in dB
    pub noise_level: i32,
    pub task:        TaskMode,
    pub batch_size:  usize,
    pub lr:          f64,
    pub epochs:      usize,
    pub num_classes: usize,
    /// Width of the first residual stage
    pub base_width:  usize,
    pub seed:        u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_root:   PathBuf::from("data/cu_data_noisy"),
            noise_level: -1,
            task:        TaskMode::FaultDetection,
            batch_size:  128,
            lr:          1e-5,
            epochs:      100,
            num_classes: 10,
            base_width:  64,
            seed:        42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch size must be at least 1");
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.num_classes == 0 {
            bail!("num_classes must be at least 1");
        }
        if self.base_width == 0 {
            bail!("base width must be at least 1");
        }
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            bail!("learning rate must be a positive number, got {}", self.lr);
        }
        if !self.task.is_scalar() {
            bail!("task '{}' has a 3-value label; a single classifier head needs fd, loc or dia", self.task);
        }
        Ok(())
    }

    pub fn train_csv(&self) -> PathBuf {
        self.noise_dir().join("train").join("train.csv")
    }

    pub fn val_csv(&self) -> PathBuf {
        self.noise_dir().join("val").join("val.csv")
    }

    fn noise_dir(&self) -> PathBuf {
        self.data_root.join(format!("{}db", self.noise_level))
    }

    pub fn hyper_parameters(&self) -> HyperParameters {
        HyperParameters { learning_rate: self.lr, batch_size: self.batch_size }
    }
}

/// Where one run writes its files.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    /// Checkpoint path; the recorder sets the .mpk.gz extension
    pub model_path:        PathBuf,
    pub train_result_path: PathBuf,
    pub val_result_path:   PathBuf,
    pub hyperparam_path:   PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
    paths:  RunPaths,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, paths: RunPaths) -> Self {
        Self { config, paths }
    }

    /// Train on the default WGPU device (best available adapter).
    pub fn execute(&self) -> Result<MetricHistory> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("using {:?} device.", device);
        self.execute_on::<TrainBackend>(device)
    }

    /// Train on any autodiff backend.
    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<MetricHistory> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Hyperparameter record ─────────────────────────────────────
        write_hyperparameters(&self.paths.hyperparam_path, &cfg.hyper_parameters())?;

        // ── Step 3: Datasets ──────────────────────────────────────────────────
        let train_dataset = load_dataset(&cfg.train_csv(), cfg)?;
        let val_dataset   = load_dataset(&cfg.val_csv(), cfg)?;

        // ── Step 4: Training loop ─────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&self.paths.model_path)?;
        let history = run_training::<B>(cfg, train_dataset, val_dataset, &ckpt_manager, &device)?;

        // ── Step 5: Result curves ─────────────────────────────────────────────
        history.write_results(&self.paths.train_result_path, &self.paths.val_result_path)?;

        Ok(history)
    }
}

fn load_dataset(path: &Path, cfg: &TrainConfig) -> Result<FaultDataset> {
    let dataset = FaultDataset::from_csv(path, cfg.task)
        .with_context(|| format!("Cannot load dataset '{}'", path.display()))?;
    dataset
        .check_class_labels(cfg.num_classes)
        .with_context(|| format!("Bad labels in '{}'", path.display()))?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use std::fs;

    type TestBackend = Autodiff<NdArray>;

    // 4 features + [fd, loc, dia]
    const SIX_ROWS: &str = "\
0.1,0.2,0.3,0.4,0,1,2
0.5,0.6,0.7,0.8,1,1,2
0.9,1.0,1.1,1.2,2,0,1
1.3,1.4,1.5,1.6,3,0,1
1.7,1.8,1.9,2.0,4,2,0
2.1,2.2,2.3,2.4,5,2,0
";

    fn write_noise_tree(root: &Path, snr: i32, train: &str, val: &str) {
        let dir = root.join(format!("{snr}db"));
        fs::create_dir_all(dir.join("train")).unwrap();
        fs::create_dir_all(dir.join("val")).unwrap();
        fs::write(dir.join("train/train.csv"), train).unwrap();
        fs::write(dir.join("val/val.csv"), val).unwrap();
    }

    fn paths(root: &Path) -> RunPaths {
        RunPaths {
            model_path:        root.join("out/exp01/model"),
            train_result_path: root.join("out/exp01/train_result.txt"),
            val_result_path:   root.join("out/exp01/val_result.txt"),
            hyperparam_path:   root.join("out/parameters.txt"),
        }
    }

    fn config(root: &Path) -> TrainConfig {
        TrainConfig {
            data_root:  root.join("data"),
            noise_level: -5,
            batch_size: 2,
            epochs:     1,
            base_width: 4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.lr, 1e-5);
        assert_eq!(cfg.epochs, 100);
        assert_eq!(cfg.num_classes, 10);
        assert_eq!(cfg.task, TaskMode::FaultDetection);
    }

    #[test]
    fn test_dataset_paths_follow_noise_level() {
        let cfg = TrainConfig { data_root: PathBuf::from("d"), noise_level: -1, ..TrainConfig::default() };
        assert_eq!(cfg.train_csv(), PathBuf::from("d/-1db/train/train.csv"));
        assert_eq!(cfg.val_csv(),   PathBuf::from("d/-1db/val/val.csv"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let ok = TrainConfig::default();
        assert!(ok.validate().is_ok());
        assert!(TrainConfig { batch_size: 0, ..ok.clone() }.validate().is_err());
        assert!(TrainConfig { epochs: 0, ..ok.clone() }.validate().is_err());
        assert!(TrainConfig { lr: 0.0, ..ok.clone() }.validate().is_err());
        assert!(TrainConfig { task: TaskMode::Multi, ..ok }.validate().is_err());
    }

    #[test]
    fn test_one_epoch_end_to_end() {
        let _rng = crate::ml::lock_backend_rng();
        let dir = tempfile::tempdir().unwrap();
        write_noise_tree(&dir.path().join("data"), -5, SIX_ROWS, SIX_ROWS);

        let paths   = paths(dir.path());
        let history = TrainUseCase::new(config(dir.path()), paths.clone())
            .execute_on::<TestBackend>(Default::default())
            .unwrap();
        assert_eq!(history.len(), 1);

        for result in [&paths.train_result_path, &paths.val_result_path] {
            let text = fs::read_to_string(result).unwrap();
            let rows: Vec<&str> = text.lines().collect();
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.split(',').count() == 1));
        }

        let hp: HyperParameters =
            serde_json::from_str(&fs::read_to_string(&paths.hyperparam_path).unwrap()).unwrap();
        assert_eq!(hp, HyperParameters { learning_rate: 1e-5, batch_size: 2 });

        assert!(paths.model_path.with_extension("mpk.gz").exists());
    }

    #[test]
    fn test_missing_dataset_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config(dir.path()), paths(dir.path()))
            .execute_on::<TestBackend>(Default::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("train.csv"));
    }

    #[test]
    fn test_label_outside_class_range_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bad = SIX_ROWS.replace("5,2,0", "12,2,0");
        write_noise_tree(&dir.path().join("data"), -5, &bad, SIX_ROWS);

        let err = TrainUseCase::new(config(dir.path()), paths(dir.path()))
            .execute_on::<TestBackend>(Default::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("Bad labels"));
    }
}
