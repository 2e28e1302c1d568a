// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between a CSV file on disk and a tensor batch.
//
// The pipeline flows in this order:
//
//   train.csv / val.csv
//       │
//       ▼
//   read_rows         → headerless CSV into Vec<Vec<f32>>
//       │
//       ▼
//   FaultDataset      → splits features from the task's label,
//       │               implements Burn's Dataset trait
//       ▼
//   epoch_loader      → seeded shuffle + drop-last per epoch
//       │
//       ▼
//   SignalBatcher     → stacks samples into [batch, 1, width]
//       │
//       ▼
//   training loop (Layer 5)
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads headerless numeric CSV files
pub mod loader;

/// Implements Burn's Dataset trait for signal samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Per-epoch shuffled, drop-last data loaders
pub mod epoch_loader;
