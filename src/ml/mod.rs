// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// The model architecture and the training loop.
//
//   model.rs    - ResNet-18 laid out over 1-D signals, with a
//                 replaceable classification head
//
//   trainer.rs  - The epoch loop: forward pass, cross-entropy,
//                 backward pass, Adam step, accuracy bookkeeping,
//                 validation pass and best-model checkpointing
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            He et al. (2016) Deep Residual Learning

/// 1-D residual network
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// NdArray keeps one process-wide RNG; tests that initialise weights
/// hold this lock so a seeded run is not interleaved with another test.
#[cfg(test)]
pub(crate) fn lock_backend_rng() -> std::sync::MutexGuard<'static, ()> {
    static BACKEND_RNG: std::sync::Mutex<()> = std::sync::Mutex::new(());
    BACKEND_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
