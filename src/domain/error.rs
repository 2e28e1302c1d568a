// ============================================================
// Layer 3 - Dataset Errors
// ============================================================
// Every way a CSV file can fail to become a dataset has its own
// variant, so callers can match on the cause and the message
// always names the offending path, row or value.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown task mode '{0}' (expected one of: fd, loc, dia, multi)")]
    UnknownTaskMode(String),

    #[error("cannot read '{path}': {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is empty: no rows to train or validate on")]
    Empty,

    #[error("row {row} has {found} columns, need at least 4 (features + 3 label columns)")]
    TooFewColumns { row: usize, found: usize },

    #[error("row {row} has {found} columns, expected {expected} like the first row")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("label {label} at row {row} is not a class id in 0..{num_classes}")]
    InvalidLabel { row: usize, label: f32, num_classes: usize },
}
