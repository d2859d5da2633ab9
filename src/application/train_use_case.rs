// ============================================================
// TrainUseCase
// ============================================================
// Orchestrates one training session in order:
//
//   Step 1: Create checkpoint manager + metrics logger (infra)
//   Step 2: Snapshot the configuration to JSON         (infra)
//   Step 3: Load the MNIST training split              (burn)
//   Step 4: Run the training loop                      (ml)
//
// The configuration object is built by the caller (CLI flags or
// a test) and handed in whole; nothing in the pipeline reads
// ambient global state.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::data::dataset::{vision::MnistDataset, Dataset};
use serde::{Deserialize, Serialize};

use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::MetricsLogger;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All parameters for a training run. Serialisable so the session can
// snapshot it next to the checkpoints it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub lr:         f64,
    pub batch_size: usize,
    pub epochs:     usize,
    pub seed:       u64,
    pub ckpt_dir:   String,
    pub log_dir:    String,
    pub resume:     bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            lr:         1e-3,
            batch_size: 64,
            epochs:     10,
            seed:       42,
            ckpt_dir:   "./checkpoint".to_string(),
            log_dir:    "./log".to_string(),
            resume:     false,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        tracing::info!(
            "Training session: lr={}, batch_size={}, epochs={}, seed={}",
            cfg.lr,
            cfg.batch_size,
            cfg.epochs,
            cfg.seed,
        );

        // ── Step 1: Persistence sinks ─────────────────────────────────────────
        // Both constructors create their directory if it is missing
        let ckpt_manager = CheckpointManager::new(&cfg.ckpt_dir)?;
        let metrics_logger = MetricsLogger::new(&cfg.log_dir)?;

        // ── Step 2: Snapshot the config ───────────────────────────────────────
        // Recorded next to the checkpoints it belongs to
        ckpt_manager.save_config(cfg)?;

        // ── Step 3: Load the dataset ──────────────────────────────────────────
        // Downloads MNIST into Burn's cache on first use. A download or
        // parse failure aborts the run here.
        let dataset = MnistDataset::train();
        tracing::info!("MNIST training split ready: {} samples", dataset.len());

        // ── Step 4: Run training loop ─────────────────────────────────────────
        run_training(cfg, dataset, &ckpt_manager, &metrics_logger)?;

        Ok(())
    }
}
