// ============================================================
// Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns shared by training and
// evaluation:
//
//   checkpoint.rs — Per-epoch model + optimizer records
//                   Uses Burn's CompactRecorder; one immutable
//                   file pair per epoch, plus the TrainConfig
//                   snapshot as JSON.
//
//   metrics.rs    — Training metrics
//                   The in-epoch running-mean accumulator and
//                   the CSV logger that appends one row of
//                   (epoch, loss, acc) per epoch.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model and optimizer checkpoint saving and loading
pub mod checkpoint;

/// Running means and the epoch metrics CSV logger
pub mod metrics;
