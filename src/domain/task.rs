// ============================================================
// Layer 3 - Task Mode
// ============================================================
// Each CSV row ends with three label columns:
//
//   ... features ..., fault_detection, location, diagnosis
//
// The task mode picks which of them the dataset exposes as the
// label. Parsing is closed: an unknown name is an error, never a
// dataset with no labels.

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

use crate::domain::error::DatasetError;
use crate::domain::sample::Label;

/// Number of trailing label columns in every CSV row.
pub const LABEL_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskMode {
    /// Third-from-last column
    FaultDetection,
    /// Second-from-last column
    Location,
    /// Last column
    Diagnosis,
    /// All three trailing columns
    Multi,
}

impl TaskMode {
    /// Select this task's label from the three trailing columns
    /// `[fault_detection, location, diagnosis]`.
    pub fn select(self, tail: [f32; LABEL_COLUMNS]) -> Label {
        match self {
            TaskMode::FaultDetection => Label::Scalar(tail[0]),
            TaskMode::Location       => Label::Scalar(tail[1]),
            TaskMode::Diagnosis      => Label::Scalar(tail[2]),
            TaskMode::Multi          => Label::Multi(tail),
        }
    }

    /// True when the label is a single class id.
    pub fn is_scalar(self) -> bool {
        !matches!(self, TaskMode::Multi)
    }
}

impl FromStr for TaskMode {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fd"  | "fault-detection"     => Ok(TaskMode::FaultDetection),
            "loc" | "location"            => Ok(TaskMode::Location),
            "dia" | "diagnosis"           => Ok(TaskMode::Diagnosis),
            "multi" | "multi-label"       => Ok(TaskMode::Multi),
            _ => Err(DatasetError::UnknownTaskMode(s.to_string())),
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskMode::FaultDetection => "fd",
            TaskMode::Location       => "loc",
            TaskMode::Diagnosis      => "dia",
            TaskMode::Multi          => "multi",
        };
        f.write_str(name)
    }
}
