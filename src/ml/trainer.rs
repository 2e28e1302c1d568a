// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Fixed-length train + validation loop using Burn's Adam.
//
// Burn notes:
//   - Training runs on an AutodiffBackend; batch norm uses batch
//     statistics there.
//   - model.valid() returns the model on B::InnerBackend: no
//     autograd and batch norm switches to running statistics.
//     The validation batcher therefore uses B::InnerBackend too.
//   - Gradients are returned fresh by loss.backward(), so there is
//     nothing to zero between steps.
//   - argmax(1) returns [batch, 1], flattened before .equal().

use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{
    data::dataset::Dataset,
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::SignalBatcher,
    dataset::FaultDataset,
    epoch_loader::{epoch_loader, full_batches},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{mean, BestAccuracy, EpochMetrics, MetricHistory};
use crate::ml::model::{ResNet, ResNetConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Run `cfg.epochs` epochs and return the per-epoch metric history.
/// The checkpoint is overwritten whenever mean validation accuracy
/// is at least the best seen so far.
pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: FaultDataset,
    val_dataset:   FaultDataset,
    ckpt_manager:  &CheckpointManager,
    device:        &B::Device,
) -> Result<MetricHistory> {
    for (name, ds) in [("training", &train_dataset), ("validation", &val_dataset)] {
        if full_batches(ds.len(), cfg.batch_size) == 0 {
            bail!(
                "{name} dataset is empty: {} samples cannot fill one batch of {}",
                ds.len(), cfg.batch_size
            );
        }
    }

    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: ResNet<B> = ResNetConfig::new()
        .with_in_channels(1)
        .with_base_width(cfg.base_width)
        .init(device)
        .with_classifier(cfg.num_classes, device);
    tracing::info!(
        "Model ready: ResNet-18 (1-D), base width {}, {} classes",
        cfg.base_width, cfg.num_classes
    );

    let mut optim = adam_config().init::<B, ResNet<B>>();

    let train_ce = CrossEntropyLossConfig::new().init::<B>(device);
    let val_ce   = CrossEntropyLossConfig::new().init::<B::InnerBackend>(device);

    let train_data = Arc::new(train_dataset);
    let val_data   = Arc::new(val_dataset);

    let mut history = MetricHistory::default();
    let mut best    = BestAccuracy::default();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let epoch_seed = cfg.seed.wrapping_add(epoch as u64);

        // ── Training phase ────────────────────────────────────────────────────
        let train_loader = epoch_loader(
            train_data.clone(),
            SignalBatcher::<B>::new(device.clone()),
            cfg.batch_size,
            epoch_seed,
        );

        let mut train_loss = Vec::new();
        let mut train_acc  = Vec::new();

        for batch in train_loader.iter() {
            let output = model.forward(batch.signals);
            let loss   = train_ce.forward(output.clone(), batch.targets.clone());

            train_acc.push(batch_accuracy(output, batch.targets));
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss.push(loss_val);
            tracing::debug!("train epoch[{}/{}] loss:{:.3}", epoch, cfg.epochs, loss_val);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let val_loader  = epoch_loader(
            val_data.clone(),
            SignalBatcher::<B::InnerBackend>::new(device.clone()),
            cfg.batch_size,
            epoch_seed,
        );

        let mut val_loss = Vec::new();
        let mut val_acc  = Vec::new();

        for batch in val_loader.iter() {
            let output = model_valid.forward(batch.signals);
            let loss   = val_ce.forward(output.clone(), batch.targets.clone());

            val_acc.push(batch_accuracy(output, batch.targets));
            val_loss.push(loss.into_scalar().elem::<f64>());
        }

        let metrics = EpochMetrics::new(
            epoch,
            mean(&train_loss),
            mean(&train_acc),
            mean(&val_loss),
            mean(&val_acc),
        );

        println!(
            "[{:02}/{:02}] train loss = {:.5}, train acc = {:.5}  valid loss = {:.5}, valid acc = {:.5}",
            epoch, cfg.epochs,
            metrics.train_loss, metrics.train_acc, metrics.val_loss, metrics.val_acc,
        );

        if best.observe(metrics.val_acc) {
            ckpt_manager.save_model(&model)?;
            tracing::info!(
                "Epoch {}: valid acc {:.5} >= best, checkpoint saved",
                epoch, metrics.val_acc
            );
        }

        history.push(metrics);
    }

    tracing::info!("Training complete! Best valid acc {:.5}", best.best());
    Ok(history)
}

/// Adam with epsilon 1e-8 in place of Burn's 1e-5 default.
pub fn adam_config() -> AdamConfig {
    AdamConfig::new().with_epsilon(1e-8)
}

/// Fraction of rows whose argmax class equals the target.
pub fn batch_accuracy<B: Backend>(output: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> f64 {
    let total = targets.dims()[0];
    if total == 0 {
        return 0.0;
    }
    let predicted = output.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskMode;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn dataset(rows: usize) -> FaultDataset {
        let rows = (0..rows)
            .map(|i| {
                let x = i as f32;
                vec![x, x + 1.0, x * 0.5, -x, (i % 10) as f32, 0.0, 0.0]
            })
            .collect();
        FaultDataset::from_rows(rows, TaskMode::FaultDetection).unwrap()
    }

    fn small_config(epochs: usize) -> TrainConfig {
        TrainConfig {
            batch_size: 2,
            epochs,
            base_width: 4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_batch_accuracy() {
        let device = Default::default();
        let output = Tensor::<NdArray, 2>::from_floats(
            [[0.9, 0.1], [0.2, 0.8], [0.7, 0.3], [0.4, 0.6]],
            &device,
        );
        let targets = Tensor::<NdArray, 1, Int>::from_ints([0, 1, 1, 0], &device);
        assert!((batch_accuracy(output, targets) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_run_training_records_every_epoch_and_checkpoints() {
        let _rng = crate::ml::lock_backend_rng();
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model")).unwrap();
        let device = Default::default();

        let history = run_training::<TestBackend>(
            &small_config(2), dataset(6), dataset(4), &ckpt, &device,
        ).unwrap();

        assert_eq!(history.len(), 2);
        for m in history.epochs() {
            assert!(m.train_loss.is_finite());
            assert!((0.0..=1.0).contains(&m.train_acc));
            assert!((0.0..=1.0).contains(&m.val_acc));
        }
        // Best starts at 0.0 and ties overwrite, so epoch 1 always saves.
        assert!(ckpt.checkpoint_file().exists());
    }

    #[test]
    fn test_adam_epsilon() {
        assert_eq!(adam_config().epsilon, 1e-8);
    }

    #[test]
    fn test_same_seed_same_history() {
        let _rng = crate::ml::lock_backend_rng();
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let cfg    = small_config(2);

        let first = run_training::<TestBackend>(
            &cfg, dataset(8), dataset(4),
            &CheckpointManager::new(dir.path().join("a/model")).unwrap(), &device,
        ).unwrap();
        let second = run_training::<TestBackend>(
            &cfg, dataset(8), dataset(4),
            &CheckpointManager::new(dir.path().join("b/model")).unwrap(), &device,
        ).unwrap();

        assert_eq!(first.len(), 2);
        for (a, b) in first.epochs().iter().zip(second.epochs()) {
            assert!((a.train_loss - b.train_loss).abs() < 1e-6);
            assert!((a.train_acc  - b.train_acc).abs()  < 1e-6);
            assert!((a.val_loss   - b.val_loss).abs()   < 1e-6);
            assert!((a.val_acc    - b.val_acc).abs()    < 1e-6);
        }
    }

    #[test]
    fn test_dataset_smaller_than_a_batch_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model")).unwrap();
        let cfg  = TrainConfig { batch_size: 8, ..small_config(1) };

        let err = run_training::<TestBackend>(&cfg, dataset(6), dataset(8), &ckpt, &Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("training dataset is empty"));
    }
}
