// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only:
//   - No model or tensor code here (Layer 5)
//   - No argument parsing or printing here (Layer 1)
//
// TrainUseCase is one training run with explicit output paths;
// SweepUseCase repeats it over runs and noise levels.

/// A single training run
pub mod train_use_case;

/// Repeated runs over noise levels
pub mod sweep_use_case;
