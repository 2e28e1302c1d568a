// ============================================================
// Layer 4 - Epoch Loader
// ============================================================
// Builds the data loader for one epoch:
//
//   Arc<FaultDataset>
//       │  ShuffledDataset::with_seed(seed)   fresh order per epoch
//       ▼
//   shuffled view
//       │  PartialDataset 0..full_batches * batch_size
//       ▼
//   truncated view                           drops the partial batch
//       │  DataLoaderBuilder
//       ▼
//   Arc<dyn DataLoader<SignalBatch<B>>>
//
// Burn's own DataLoaderBuilder::shuffle keeps the last partial
// batch, so the shuffle and truncation happen on the dataset side.
// No worker threads are used; batches are produced on the caller's
// thread.

use std::sync::Arc;

use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::{
            transform::{PartialDataset, ShuffledDataset},
            Dataset,
        },
    },
    prelude::*,
};

use crate::data::batcher::{SignalBatch, SignalBatcher};
use crate::domain::sample::SignalSample;

/// Number of complete batches of `batch_size` in `len` samples.
pub fn full_batches(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 { 0 } else { len / batch_size }
}

/// A loader over a seeded shuffle of `dataset` with the last
/// partial batch dropped.
pub fn epoch_loader<B, D>(
    dataset:    Arc<D>,
    batcher:    SignalBatcher<B>,
    batch_size: usize,
    seed:       u64,
) -> Arc<dyn DataLoader<SignalBatch<B>>>
where
    B: Backend,
    D: Dataset<SignalSample> + 'static,
{
    let kept = full_batches(dataset.len(), batch_size) * batch_size;

    let shuffled: ShuffledDataset<Arc<D>, SignalSample> =
        ShuffledDataset::with_seed(dataset, seed);
    let truncated: PartialDataset<_, SignalSample> = PartialDataset::new(shuffled, 0, kept);

    DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .build(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::FaultDataset;
    use crate::domain::task::TaskMode;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    // Label i on row i so the shuffle order is visible in the targets.
    fn dataset(rows: usize) -> Arc<FaultDataset> {
        let rows = (0..rows)
            .map(|i| vec![i as f32, 0.0, 1.0, 2.0, i as f32, 0.0, 0.0])
            .collect();
        Arc::new(FaultDataset::from_rows(rows, TaskMode::FaultDetection).unwrap())
    }

    fn epoch_order(ds: Arc<FaultDataset>, batch_size: usize, seed: u64) -> Vec<Vec<i64>> {
        let batcher = SignalBatcher::<TestBackend>::new(Default::default());
        epoch_loader(ds, batcher, batch_size, seed)
            .iter()
            .map(|b| b.targets.into_data().iter::<i64>().collect())
            .collect()
    }

    #[test]
    fn test_full_batches() {
        assert_eq!(full_batches(6, 2), 3);
        assert_eq!(full_batches(7, 2), 3);
        assert_eq!(full_batches(1, 128), 0);
        assert_eq!(full_batches(5, 0), 0);
    }

    #[test]
    fn test_six_rows_batch_two_gives_three_batches() {
        let batcher = SignalBatcher::<TestBackend>::new(Default::default());
        let loader  = epoch_loader(dataset(6), batcher, 2, 7);
        let shapes: Vec<[usize; 3]> = loader.iter().map(|b| b.signals.dims()).collect();
        assert_eq!(shapes, vec![[2, 1, 4]; 3]);
    }

    #[test]
    fn test_partial_batch_is_dropped() {
        let order = epoch_order(dataset(7), 2, 1);
        assert_eq!(order.len(), 3);
        assert!(order.iter().all(|b| b.len() == 2));
    }

    #[test]
    fn test_every_sample_seen_once_when_divisible() {
        let mut seen: Vec<i64> = epoch_order(dataset(6), 3, 11).into_iter().flatten().collect();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let ds = dataset(16);
        assert_eq!(epoch_order(ds.clone(), 4, 3), epoch_order(ds, 4, 3));
    }
}
