// ============================================================
// ML / Model Layer (Burn)
// ============================================================
// All Burn-heavy code lives here.
//
//   model.rs     — The convolutional digit classifier
//                  Two conv+pool+ReLU stages, two linear
//                  stages, dropout in between; raw 10-way
//                  scores out.
//
//   trainer.rs   — The training loop
//                  Forward pass, loss on raw scores, backward
//                  pass, Adam step, running-mean progress
//                  lines, per-epoch metrics row + checkpoint
//                  pair, optional resume.
//
//   evaluator.rs — The evaluation pass
//                  Loads the latest checkpoint and measures
//                  loss/accuracy over the held-out test split
//                  on the plain (non-autodiff) backend.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            LeCun et al. (1998) Gradient-Based Learning
//            Applied to Document Recognition

/// Convolutional digit classifier architecture
pub mod model;

/// Manual training loop with checkpointing and metrics
pub mod trainer;

/// Test-split evaluation of a checkpointed model
pub mod evaluator;
