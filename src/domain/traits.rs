// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// Per-sample transforms the dataset applies in `get`.
//
// Any `Fn(T) -> T` closure that is Send + Sync is a Transform,
// so callers can write:
//
//   dataset.with_feature_transform(|row: Vec<f32>| normalise(row))
//
// Implementations:
//   - closures (blanket impl below)
//   - (future) named structs such as a z-score normaliser

use crate::domain::sample::Label;

/// A pure value-to-value transform.
pub trait Transform<T>: Send + Sync {
    fn apply(&self, value: T) -> T;
}

impl<T, F> Transform<T> for F
where
    F: Fn(T) -> T + Send + Sync,
{
    fn apply(&self, value: T) -> T {
        self(value)
    }
}

/// Applied to the raw feature row before the channel dimension is added.
pub type FeatureTransform = dyn Transform<Vec<f32>>;

/// Applied to the label selected by the task mode.
pub type LabelTransform = dyn Transform<Label>;
