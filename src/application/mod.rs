// ============================================================
// Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal
// (training a model or evaluating a checkpoint). Only workflow
// coordination lives here; the tensor math stays in ml and the
// file handling in infra.
//
// Reference: Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The checkpoint evaluation workflow
pub mod eval_use_case;
