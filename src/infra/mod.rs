// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Everything a run writes to disk:
//
//   checkpoint.rs - Best-model weights via Burn's CompactRecorder,
//                   plus the hyperparameter record written at the
//                   start of every run
//
//   metrics.rs    - Per-epoch loss / accuracy history, the result
//                   files written at the end of a run, and the
//                   best-accuracy checkpoint policy
//
// Output directories are created on demand, so a fresh
// result/group*/exp* tree needs no setup.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Epoch metrics and result files
pub mod metrics;

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display())),
        _ => Ok(()),
    }
}
