// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing what a fault-diagnosis sample is.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, traits and error types
//
// Every other layer speaks in these terms: the CSV loader
// produces rows that become SignalSamples, the batcher turns
// SignalSamples into tensors, and TaskMode decides which of the
// three trailing CSV columns is the label.

/// Which trailing CSV column(s) are the label
pub mod task;

/// One signal sample and its label
pub mod sample;

/// Typed errors for dataset construction and access
pub mod error;

/// Extension points for per-sample transforms
pub mod traits;
