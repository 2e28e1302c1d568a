use std::{path::Path, sync::Arc};

use burn::data::dataset::Dataset;

use crate::data::loader::read_rows;
use crate::domain::{
    error::DatasetError,
    sample::{Label, SignalSample},
    task::{TaskMode, LABEL_COLUMNS},
    traits::{FeatureTransform, LabelTransform, Transform},
};

/// Vibration signals split into feature rows and task labels.
///
/// Every row of the source file is `features..., fd, loc, dia`;
/// the features keep their order and the task mode chooses the label.
pub struct FaultDataset {
    features:          Vec<Vec<f32>>,
    labels:            Vec<Label>,
    feature_transform: Option<Arc<FeatureTransform>>,
    label_transform:   Option<Arc<LabelTransform>>,
}

impl FaultDataset {
    pub fn from_csv(path: impl AsRef<Path>, task: TaskMode) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let dataset = Self::from_rows(read_rows(path)?, task)?;
        tracing::info!(
            "Loaded {} samples ({} features, task {}) from '{}'",
            dataset.features.len(), dataset.feature_width(), task, path.display()
        );
        Ok(dataset)
    }

    pub fn from_rows(rows: Vec<Vec<f32>>, task: TaskMode) -> Result<Self, DatasetError> {
        let width = rows.first().map(Vec::len).ok_or(DatasetError::Empty)?;

        let mut features = Vec::with_capacity(rows.len());
        let mut labels   = Vec::with_capacity(rows.len());

        for (row, mut values) in rows.into_iter().enumerate() {
            if values.len() <= LABEL_COLUMNS {
                return Err(DatasetError::TooFewColumns { row, found: values.len() });
            }
            if values.len() != width {
                return Err(DatasetError::RaggedRow { row, expected: width, found: values.len() });
            }
            let tail = values.split_off(width - LABEL_COLUMNS);
            labels.push(task.select([tail[0], tail[1], tail[2]]));
            features.push(values);
        }

        Ok(Self { features, labels, feature_transform: None, label_transform: None })
    }

    pub fn with_feature_transform<T>(mut self, transform: T) -> Self
    where
        T: Transform<Vec<f32>> + 'static,
    {
        self.feature_transform = Some(Arc::new(transform));
        self
    }

    pub fn with_label_transform<T>(mut self, transform: T) -> Self
    where
        T: Transform<Label> + 'static,
    {
        self.label_transform = Some(Arc::new(transform));
        self
    }

    /// Number of feature columns (row width minus the label columns).
    pub fn feature_width(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    /// Like `get`, but an out-of-range index is an error instead of `None`.
    pub fn try_get(&self, index: usize) -> Result<SignalSample, DatasetError> {
        self.get(index)
            .ok_or(DatasetError::IndexOutOfRange { index, len: self.features.len() })
    }

    /// Check that every label, after the label transform, is an
    /// integral class id in `0..num_classes`.
    pub fn check_class_labels(&self, num_classes: usize) -> Result<(), DatasetError> {
        for (row, &label) in self.labels.iter().enumerate() {
            let value = self.transform_label(label).class_value();
            if value.fract() != 0.0 || value < 0.0 || value >= num_classes as f32 {
                return Err(DatasetError::InvalidLabel { row, label: value, num_classes });
            }
        }
        Ok(())
    }

    fn transform_label(&self, label: Label) -> Label {
        match &self.label_transform {
            Some(t) => t.apply(label),
            None    => label,
        }
    }
}

impl Dataset<SignalSample> for FaultDataset {
    fn get(&self, index: usize) -> Option<SignalSample> {
        let features = self.features.get(index)?.clone();
        let label    = self.labels[index];

        let features = match &self.feature_transform {
            Some(t) => t.apply(features),
            None    => features,
        };
        let label = self.transform_label(label);

        Some(SignalSample::new(features, label))
    }

    fn len(&self) -> usize {
        self.features.len()
    }
}
