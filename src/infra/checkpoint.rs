// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder,
// and writes the hyperparameter record of a run.
//
// What gets written per run:
//   1. Model weights (<model path>.mpk.gz) - overwritten each time
//      validation accuracy reaches a new best (ties included)
//   2. Hyperparameters (JSON)              - once, before training
//
// Burn's CompactRecorder:
//   - Serialises parameters as named MessagePack
//   - Compresses with gzip, stores floats at half precision
//   - Replaces any extension on the given path with .mpk.gz
//   - Type-safe: loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::infra::ensure_parent_dir;
use crate::ml::model::ResNet;

/// Extension CompactRecorder puts on checkpoint files.
const CHECKPOINT_EXTENSION: &str = "mpk.gz";

/// Owns the single checkpoint path of one run.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    path: PathBuf,
}

impl CheckpointManager {
    /// Creates the checkpoint's parent directory if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        Ok(Self { path })
    }

    /// The file the recorder actually writes.
    pub fn checkpoint_file(&self) -> PathBuf {
        self.path.with_extension(CHECKPOINT_EXTENSION)
    }

    /// Overwrite the checkpoint with the model's current parameters.
    pub fn save_model<B: Backend>(&self, model: &ResNet<B>) -> Result<()> {
        CompactRecorder::new()
            .record(model.clone().into_record(), self.path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", self.checkpoint_file().display())
            })?;

        tracing::debug!("Saved checkpoint '{}'", self.checkpoint_file().display());
        Ok(())
    }

    /// Load the checkpoint into `model`, which must have the same
    /// architecture as the one that was saved.
    pub fn load_model<B: Backend>(&self, model: ResNet<B>, device: &B::Device) -> Result<ResNet<B>> {
        let record = CompactRecorder::new()
            .load(self.path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Has a training run saved it?",
                    self.checkpoint_file().display()
                )
            })?;

        Ok(model.load_record(record))
    }
}

/// The two fixed hyperparameters recorded for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParameters {
    pub learning_rate: f64,
    pub batch_size:    usize,
}

/// Write `hp` as pretty JSON, creating parent directories as needed.
pub fn write_hyperparameters(path: &Path, hp: &HyperParameters) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(hp)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write hyperparameters to '{}'", path.display()))?;

    tracing::debug!("Saved hyperparameters to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::ResNetConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small_model(device: &<TestBackend as Backend>::Device) -> ResNet<TestBackend> {
        ResNetConfig::new()
            .with_base_width(4)
            .with_blocks(vec![1, 1])
            .init(device)
            .with_classifier(10, device)
    }

    #[test]
    fn test_checkpoint_file_uses_recorder_extension() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("exp01/model.pth")).unwrap();
        assert_eq!(ckpt.checkpoint_file(), dir.path().join("exp01/model.mpk.gz"));
        assert!(dir.path().join("exp01").is_dir());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let _rng = crate::ml::lock_backend_rng();
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let ckpt   = CheckpointManager::new(dir.path().join("model")).unwrap();

        let saved = small_model(&device);
        ckpt.save_model(&saved).unwrap();
        assert!(ckpt.checkpoint_file().exists());

        let loaded = ckpt.load_model(small_model(&device), &device).unwrap();
        let a: Vec<f32> = saved.fc.weight.val().into_data().iter::<f32>().collect();
        let b: Vec<f32> = loaded.fc.weight.val().into_data().iter::<f32>().collect();
        assert_eq!(a.len(), b.len());
        // half-precision storage
        assert!(a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-2));
    }

    #[test]
    fn test_load_without_checkpoint_fails() {
        let _rng = crate::ml::lock_backend_rng();
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("missing")).unwrap();
        assert!(ckpt.load_model(small_model(&Default::default()), &Default::default()).is_err());
    }

    #[test]
    fn test_hyperparameter_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("group2/parameters.txt");
        let hp   = HyperParameters { learning_rate: 1e-5, batch_size: 128 };

        write_hyperparameters(&path, &hp).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"batch_size\": 128"));
        let back: HyperParameters = serde_json::from_str(&text).unwrap();
        assert_eq!(back, hp);
    }
}
