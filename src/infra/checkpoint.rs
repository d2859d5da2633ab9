// ============================================================
// Checkpoint Manager
// ============================================================
// Saves and restores model + optimizer state using Burn's
// CompactRecorder (MessagePack records).
//
// What gets saved per epoch:
//   1. model_epoch_<E>.mpk - all learned parameters
//   2. optim_epoch_<E>.mpk - Adam moment estimates
// plus, once per session:
//   3. config.json         - the training configuration snapshot
//
// File naming convention:
//   checkpoint/
//     model_epoch_1.mpk   ← model record after epoch 1
//     optim_epoch_1.mpk   ← optimizer record after epoch 1
//     model_epoch_2.mpk
//     optim_epoch_2.mpk
//     ...
//     config.json
//
// Prior epochs are never overwritten or deleted. "Latest" is
// resolved by parsing the epoch number out of each filename and
// comparing numerically, and an epoch only counts when both
// files of its pair exist. Stray files in the directory are
// skipped, never loaded.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use burn::{
    optim::Optimizer,
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use std::{collections::HashSet, fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Net;

const MODEL_PREFIX: &str = "model_epoch_";
const OPTIM_PREFIX: &str = "optim_epoch_";

/// Manages the per-epoch checkpoint files in one directory.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir: PathBuf = dir.into();
        fs::create_dir_all(&dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", dir.display())
        })?;
        Ok(Self { dir })
    }

    /// Save the checkpoint pair for a given epoch.
    ///
    /// Records the model parameters and the optimizer state as two
    /// files named after the epoch. Earlier epochs stay untouched, so
    /// the directory accumulates the full training history.
    pub fn save<B, O>(&self, model: &Net<B>, optim: &O, epoch: usize) -> Result<()>
    where
        B: AutodiffBackend,
        O: Optimizer<Net<B>, B>,
    {
        let model_path = self.dir.join(format!("{MODEL_PREFIX}{epoch}"));
        CompactRecorder::new()
            .record(model.clone().into_record(), model_path.clone())
            .with_context(|| {
                format!("Failed to save model checkpoint to '{}'", model_path.display())
            })?;

        let optim_path = self.dir.join(format!("{OPTIM_PREFIX}{epoch}"));
        CompactRecorder::new()
            .record(optim.to_record(), optim_path.clone())
            .with_context(|| {
                format!("Failed to save optimizer checkpoint to '{}'", optim_path.display())
            })?;

        tracing::debug!("Saved checkpoint pair for epoch {}", epoch);
        Ok(())
    }

    /// Restore model and optimizer from the latest complete checkpoint pair.
    ///
    /// Both arguments must be freshly constructed with the training
    /// architecture; their state is replaced by the loaded records.
    /// Returns the restored pair together with the epoch it came from.
    pub fn restore<B, O>(
        &self,
        model:  Net<B>,
        optim:  O,
        device: &B::Device,
    ) -> Result<(Net<B>, O, usize)>
    where
        B: AutodiffBackend,
        O: Optimizer<Net<B>, B>,
    {
        let epoch = self
            .latest_epoch()?
            .ok_or_else(|| self.no_checkpoint_error())?;

        tracing::info!("Restoring checkpoint pair from epoch {}", epoch);

        let model_path = self.dir.join(format!("{MODEL_PREFIX}{epoch}"));
        let model_record = CompactRecorder::new()
            .load(model_path.clone(), device)
            .with_context(|| {
                format!("Cannot load model checkpoint '{}'", model_path.display())
            })?;

        let optim_path = self.dir.join(format!("{OPTIM_PREFIX}{epoch}"));
        let optim_record = CompactRecorder::new()
            .load(optim_path.clone(), device)
            .with_context(|| {
                format!("Cannot load optimizer checkpoint '{}'", optim_path.display())
            })?;

        Ok((model.load_record(model_record), optim.load_record(optim_record), epoch))
    }

    /// Load only the model from the latest complete checkpoint pair.
    ///
    /// Used by evaluation, which runs on the plain (non-autodiff)
    /// backend and never touches optimizer state.
    pub fn load_model<B: Backend>(
        &self,
        model:  Net<B>,
        device: &B::Device,
    ) -> Result<(Net<B>, usize)> {
        let epoch = self
            .latest_epoch()?
            .ok_or_else(|| self.no_checkpoint_error())?;

        let path = self.dir.join(format!("{MODEL_PREFIX}{epoch}"));
        tracing::info!("Loading model checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model checkpoint '{}'", path.display())
            })?;

        Ok((model.load_record(record), epoch))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("config.json");

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' first.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Numerically greatest epoch for which both checkpoint files exist.
    ///
    /// Scans the directory and parses the epoch number out of every
    /// `model_epoch_<E>.mpk` / `optim_epoch_<E>.mpk` filename. Filenames
    /// that don't match either pattern are skipped, and an epoch with
    /// only one file of the pair (a run killed mid-save) is not counted.
    /// Returns `Ok(None)` when no complete pair exists yet.
    pub fn latest_epoch(&self) -> Result<Option<usize>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut model_epochs: Vec<usize> = Vec::new();
        let mut optim_epochs: HashSet<usize> = HashSet::new();

        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Cannot read checkpoint directory '{}'", self.dir.display())
        })?;

        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();

            if let Some(epoch) = parse_epoch(&name, MODEL_PREFIX) {
                model_epochs.push(epoch);
            } else if let Some(epoch) = parse_epoch(&name, OPTIM_PREFIX) {
                optim_epochs.insert(epoch);
            } else {
                tracing::debug!("Skipping non-checkpoint file '{}'", name);
            }
        }

        Ok(model_epochs
            .into_iter()
            .filter(|epoch| optim_epochs.contains(epoch))
            .max())
    }

    fn no_checkpoint_error(&self) -> anyhow::Error {
        anyhow!(
            "No checkpoint found in '{}'. Have you run 'train' first?",
            self.dir.display()
        )
    }
}

/// Parse the epoch number out of a checkpoint filename,
/// e.g. `model_epoch_7.mpk` with prefix `model_epoch_` gives 7.
fn parse_epoch(file_name: &str, prefix: &str) -> Option<usize> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(".mpk")?
        .parse()
        .ok()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use burn::module::AutodiffModule;
    use burn::nn::loss::CrossEntropyLossConfig;
    use burn::optim::{AdamConfig, GradientsParams};
    use burn::tensor::Distribution;
    use serial_test::serial;

    type TestBackend = Autodiff<NdArray>;

    fn touch(dir: &std::path::Path, name: &str) {
        fs::File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_parse_epoch_from_filename() {
        assert_eq!(parse_epoch("model_epoch_7.mpk", MODEL_PREFIX), Some(7));
        assert_eq!(parse_epoch("optim_epoch_12.mpk", OPTIM_PREFIX), Some(12));
        assert_eq!(parse_epoch("model_epoch_.mpk", MODEL_PREFIX), None);
        assert_eq!(parse_epoch("model_epoch_7.bin", MODEL_PREFIX), None);
        assert_eq!(parse_epoch("notes.txt", MODEL_PREFIX), None);
    }

    #[test]
    fn test_latest_epoch_compares_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path()).unwrap();

        for epoch in ["2", "10"] {
            touch(dir.path(), &format!("model_epoch_{epoch}.mpk"));
            touch(dir.path(), &format!("optim_epoch_{epoch}.mpk"));
        }

        // "10" sorts before "2" lexicographically; the parsed
        // comparison must still pick epoch 10
        assert_eq!(manager.latest_epoch().unwrap(), Some(10));
    }

    #[test]
    fn test_latest_epoch_skips_strays_and_torn_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path()).unwrap();

        touch(dir.path(), "model_epoch_1.mpk");
        touch(dir.path(), "optim_epoch_1.mpk");
        // Epoch 3 has no optimizer file: a run killed mid-save
        touch(dir.path(), "model_epoch_3.mpk");
        touch(dir.path(), "config.json");
        touch(dir.path(), "zzz_notes.txt");

        assert_eq!(manager.latest_epoch().unwrap(), Some(1));
    }

    #[test]
    fn test_latest_epoch_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path()).unwrap();
        assert_eq!(manager.latest_epoch().unwrap(), None);
    }

    // Building a Net draws from the backend's global RNG; serial
    // keeps those draws from interleaving with the seeded tests.
    #[test]
    #[serial]
    fn test_save_then_restore_reproduces_state() {
        let dir = tempfile::tempdir().unwrap();
        let device = NdArrayDevice::default();

        let mut model = Net::<TestBackend>::new(&device);
        let mut optim = AdamConfig::new().init();

        // One real step so the optimizer has moment state worth saving
        let images =
            Tensor::<TestBackend, 3>::random([4, 28, 28], Distribution::Default, &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 3], &device);
        let loss = CrossEntropyLossConfig::new()
            .init(&device)
            .forward(model.forward(images), targets);
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(1e-3, model, grads);

        let manager = CheckpointManager::new(dir.path()).unwrap();
        manager.save(&model, &optim, 1).unwrap();

        assert!(dir.path().join("model_epoch_1.mpk").exists());
        assert!(dir.path().join("optim_epoch_1.mpk").exists());

        let (restored, restored_optim, epoch) = manager
            .restore(Net::<TestBackend>::new(&device), AdamConfig::new().init(), &device)
            .unwrap();
        assert_eq!(epoch, 1);

        // Identical parameters produce identical scores; compare on the
        // inner backend so dropout stays inactive
        let probe = Tensor::<NdArray, 3>::random([2, 28, 28], Distribution::Default, &device);
        let original = model.valid().forward(probe.clone());
        let reloaded = restored.valid().forward(probe);
        assert_eq!(original.into_data(), reloaded.into_data());

        // The optimizer record must carry the same per-parameter entries
        let entries_before = optim.to_record().len();
        let entries_after = restored_optim.to_record().len();
        assert!(entries_before > 0);
        assert_eq!(entries_after, entries_before);
    }

    #[test]
    #[serial]
    fn test_restore_on_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let device = NdArrayDevice::default();
        let manager = CheckpointManager::new(dir.path()).unwrap();

        let result = manager.load_model(Net::<NdArray>::new(&device), &device);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path()).unwrap();

        let cfg = TrainConfig {
            epochs: 3,
            lr: 5e-4,
            ..TrainConfig::default()
        };
        manager.save_config(&cfg).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.epochs, 3);
        assert!((loaded.lr - 5e-4).abs() < 1e-12);
        assert_eq!(loaded.batch_size, cfg.batch_size);
    }
}
