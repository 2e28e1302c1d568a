// ============================================================
// Layer 6 - Metrics
// ============================================================
// Collects per-epoch loss / accuracy and writes the result curves.
//
// Result file layout (one file per phase):
//
//   row 1: loss     e1,e2,...,eN
//   row 2: accuracy e1,e2,...,eN
//
// Every value has 5 decimal places, e.g. for 3 epochs:
//
//   2.31045,2.10988,1.98712
//   0.10938,0.21094,0.28125
//
// The checkpoint policy also lives here: BestAccuracy starts at
// 0.0 and accepts any accuracy that is >= the best so far, so a
// tie overwrites the checkpoint.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use serde::{Deserialize, Serialize};

use crate::infra::ensure_parent_dir;

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Batch means for one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_acc: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }
}

/// Ordered metrics for a whole run.
#[derive(Debug, Clone, Default)]
pub struct MetricHistory {
    epochs: Vec<EpochMetrics>,
}

impl MetricHistory {
    pub fn push(&mut self, m: EpochMetrics) {
        self.epochs.push(m);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    /// [loss series, accuracy series] of the training phase
    pub fn train_rows(&self) -> [Vec<f64>; 2] {
        [
            self.epochs.iter().map(|m| m.train_loss).collect(),
            self.epochs.iter().map(|m| m.train_acc).collect(),
        ]
    }

    /// [loss series, accuracy series] of the validation phase
    pub fn val_rows(&self) -> [Vec<f64>; 2] {
        [
            self.epochs.iter().map(|m| m.val_loss).collect(),
            self.epochs.iter().map(|m| m.val_acc).collect(),
        ]
    }

    /// Write the training and validation curves, creating parent
    /// directories as needed.
    pub fn write_results(&self, train_path: &Path, val_path: &Path) -> Result<()> {
        write_rows(train_path, &self.train_rows())?;
        write_rows(val_path, &self.val_rows())?;
        tracing::info!(
            "Wrote {} epochs of results to '{}' and '{}'",
            self.len(), train_path.display(), val_path.display()
        );
        Ok(())
    }
}

/// Comma-delimited rows, 5 decimal places, newline after every row.
pub fn format_rows(rows: &[Vec<f64>]) -> String {
    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.5}")).collect();
            cells.join(",") + "\n"
        })
        .collect()
}

fn write_rows(path: &Path, rows: &[Vec<f64>]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, format_rows(rows))
        .with_context(|| format!("Cannot write results to '{}'", path.display()))
}

/// Best mean validation accuracy seen so far.
#[derive(Debug, Clone, Default)]
pub struct BestAccuracy {
    best: f64,
}

impl BestAccuracy {
    /// Returns true, and records `acc`, when `acc >= best`.
    pub fn observe(&mut self, acc: f64) -> bool {
        if acc >= self.best {
            self.best = acc;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> f64 {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> MetricHistory {
        let mut h = MetricHistory::default();
        for e in 1..=n {
            let e_f = e as f64;
            h.push(EpochMetrics::new(e, 2.0 / e_f, 0.1 * e_f, 2.5 / e_f, 0.05 * e_f));
        }
        h
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_best_accuracy_tie_overwrites() {
        let mut best = BestAccuracy::default();
        assert!(best.observe(0.0));
        assert!(best.observe(0.5));
        assert!(best.observe(0.5));
        assert!(!best.observe(0.4999));
        assert_eq!(best.best(), 0.5);
    }

    #[test]
    fn test_format_rows_uses_five_decimals() {
        let text = format_rows(&[vec![1.0, 0.1234567], vec![-0.5, 2.0]]);
        assert_eq!(text, "1.00000,0.12346\n-0.50000,2.00000\n");
    }

    #[test]
    fn test_result_files_have_two_rows_and_one_column_per_epoch() {
        let dir   = tempfile::tempdir().unwrap();
        let train = dir.path().join("exp01/train_result.txt");
        let val   = dir.path().join("exp01/val_result.txt");

        history(3).write_results(&train, &val).unwrap();

        for path in [&train, &val] {
            let text = fs::read_to_string(path).unwrap();
            let rows: Vec<&str> = text.lines().collect();
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.split(',').count() == 3));
        }
        let train_text = fs::read_to_string(&train).unwrap();
        assert_eq!(train_text.lines().next().unwrap(), "2.00000,1.00000,0.66667");
    }
}
