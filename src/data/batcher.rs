// ============================================================
// Layer 4 - Signal Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SignalSample>
// into the two tensors the training loop consumes.
//
// How batching works here:
//   Input:  N SignalSamples, each a [1, W] channel map
//   Output: signals [N, 1, W] (float), targets [N] (int)
//
//   Every row of a dataset has the same width, so we flatten all
//   channel maps into one Vec<f32> and reshape:
//   [s1_c1_w1, ..., s1_c1_wW, s2_c1_w1, ..., sN_c1_wW] → [N, 1, W]
//
//   Labels are stored as floats in the CSV; the loss needs
//   integer class ids, so they are cast here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::sample::SignalSample;

/// A batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SignalBatch<B: Backend> {
    /// [batch_size, channels, width]
    pub signals: Tensor<B, 3>,

    /// [batch_size] class ids
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the device so tensors are created where the model lives.
#[derive(Clone, Debug)]
pub struct SignalBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SignalBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SignalSample, SignalBatch<B>> for SignalBatcher<B> {
    fn batch(&self, items: Vec<SignalSample>) -> SignalBatch<B> {
        let batch_size        = items.len();
        let [channels, width] = items[0].shape();

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.signal.iter().flatten().copied())
            .collect();

        let targets: Vec<i32> = items
            .iter()
            .map(|s| s.label.class_value() as i32)
            .collect();

        let signals = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, channels, width]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        SignalBatch { signals, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::Label;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device  = Default::default();
        let batcher = SignalBatcher::<TestBackend>::new(device);
        let items = vec![
            SignalSample::new(vec![1.0, 2.0, 3.0, 4.0], Label::Scalar(3.0)),
            SignalSample::new(vec![5.0, 6.0, 7.0, 8.0], Label::Scalar(9.0)),
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.signals.dims(), [2, 1, 4]);
        assert_eq!(batch.targets.dims(), [2]);

        let values: Vec<f32> = batch.signals.into_data().iter::<f32>().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let targets: Vec<i64> = batch.targets.into_data().iter::<i64>().collect();
        assert_eq!(targets, vec![3, 9]);
    }
}
