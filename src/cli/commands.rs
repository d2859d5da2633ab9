// ============================================================
// CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `eval`, and their
// configurable flags. Every default reproduces the canonical
// run, so a bare `mnist-cnn train` needs no flags at all.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string to usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::eval_use_case::EvalConfig;
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the digit classifier on the MNIST training split
    Train(TrainArgs),

    /// Evaluate the latest checkpoint on the MNIST test split
    Eval(EvalArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Seed for weight initialization, dropout masks and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Directory receiving one checkpoint pair per epoch
    #[arg(long, default_value = "./checkpoint")]
    pub ckpt_dir: String,

    /// Directory receiving the metrics CSV
    #[arg(long, default_value = "./log")]
    pub log_dir: String,

    /// Restore the latest checkpoint pair and continue from there
    #[arg(long)]
    pub resume: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between presentation and application:
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            lr:         a.lr,
            batch_size: a.batch_size,
            epochs:     a.epochs,
            seed:       a.seed,
            ckpt_dir:   a.ckpt_dir,
            log_dir:    a.log_dir,
            resume:     a.resume,
        }
    }
}

/// All arguments for the `eval` command
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "./checkpoint")]
    pub ckpt_dir: String,

    /// Number of samples per evaluation batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,
}

impl From<EvalArgs> for EvalConfig {
    fn from(a: EvalArgs) -> Self {
        EvalConfig {
            ckpt_dir:   a.ckpt_dir,
            batch_size: a.batch_size,
        }
    }
}
