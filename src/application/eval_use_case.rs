// ============================================================
// Eval Use Case
// ============================================================
// Loads the latest checkpoint and measures the model on the
// MNIST test split. Read-only: no parameter is mutated and no
// checkpoint is written.

use anyhow::Result;

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::evaluator::run_evaluation;

// ─── Evaluation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub ckpt_dir:   String,
    pub batch_size: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            ckpt_dir:   "./checkpoint".to_string(),
            batch_size: 64,
        }
    }
}

// ─── EvalUseCase ──────────────────────────────────────────────────────────────
pub struct EvalUseCase {
    config: EvalConfig,
}

impl EvalUseCase {
    /// Create a new EvalUseCase with the given configuration
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Load the latest checkpoint, stream the test split through it
    /// and print the summary line.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        tracing::info!(
            "Evaluation session: ckpt_dir='{}', batch_size={}",
            cfg.ckpt_dir,
            cfg.batch_size,
        );

        let ckpt_manager = CheckpointManager::new(&cfg.ckpt_dir)?;
        let (epoch, report) = run_evaluation(&ckpt_manager, cfg.batch_size)?;

        println!(
            "Eval: Epoch {:04} | Samples {} | Loss {:.4} | Acc {:.4}",
            epoch, report.samples, report.loss, report.acc,
        );

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eval_config_values() {
        let cfg = EvalConfig::default();
        assert_eq!(cfg.ckpt_dir, "./checkpoint");
        assert_eq!(cfg.batch_size, 64);
    }
}
