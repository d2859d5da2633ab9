// ============================================================
// CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to the application layer.
//
// Two commands are supported:
//   1. `train` — trains the classifier on the MNIST train split
//   2. `eval`  — scores the latest checkpoint on the test split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, TrainArgs};

/// The main CLI struct: clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "mnist-cnn",
    version = "0.1.0",
    about = "Train a convolutional MNIST digit classifier, then evaluate it."
)]
pub struct Cli {
    /// The subcommand to run (train or eval)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin: it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Eval(args) => run_eval(args),
        }
    }
}

/// Handles the `train` subcommand.
/// Converts CLI args into a TrainConfig and hands off to the use case.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!(
        "Starting training for {} epochs (batch size {}, seed {})",
        args.epochs,
        args.batch_size,
        args.seed
    );

    // Convert CLI args into the application config
    let use_case = TrainUseCase::new(args.into());
    use_case.execute()?;

    println!("Training complete. Checkpoints saved.");
    Ok(())
}

/// Handles the `eval` subcommand.
/// Restores the newest checkpoint and prints its test-set score.
fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::eval_use_case::EvalUseCase;

    tracing::info!("Evaluating latest checkpoint in: {}", args.ckpt_dir);

    let use_case = EvalUseCase::new(args.into());
    use_case.execute()
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_train_defaults_parse() {
        let cli = Cli::try_parse_from(["mnist-cnn", "train"]).unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected the train subcommand");
        };
        let cfg: TrainConfig = args.into();
        let defaults = TrainConfig::default();

        assert_eq!(cfg.lr, defaults.lr);
        assert_eq!(cfg.batch_size, defaults.batch_size);
        assert_eq!(cfg.epochs, defaults.epochs);
        assert_eq!(cfg.seed, defaults.seed);
        assert_eq!(cfg.ckpt_dir, defaults.ckpt_dir);
        assert_eq!(cfg.log_dir, defaults.log_dir);
        assert!(!cfg.resume);
    }

    #[test]
    fn test_train_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "mnist-cnn",
            "train",
            "--lr",
            "0.01",
            "--epochs",
            "2",
            "--resume",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected the train subcommand");
        };

        assert_eq!(args.lr, 0.01);
        assert_eq!(args.epochs, 2);
        assert!(args.resume);
    }

    #[test]
    fn test_eval_defaults_parse() {
        let cli = Cli::try_parse_from(["mnist-cnn", "eval"]).unwrap();
        let Commands::Eval(args) = cli.command else {
            panic!("expected the eval subcommand");
        };

        assert_eq!(args.ckpt_dir, "./checkpoint");
        assert_eq!(args.batch_size, 64);
    }
}
