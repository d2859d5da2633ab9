// ============================================================
// Metrics
// ============================================================
// Two pieces: an in-memory running-mean accumulator used inside
// an epoch, and a CSV logger that records one row per epoch.
//
// Metrics recorded per epoch:
//   - epoch: the epoch number (1, 2, 3, ...)
//   - loss:  mean cross-entropy loss over the epoch's batches
//   - acc:   mean batch accuracy over the epoch's batches
//
// Output file: <log_dir>/metrics.csv
//
// Example CSV output:
//   epoch,loss,acc
//   1,0.412394,0.871594
//   2,0.148210,0.955307
//   ...
//
// The file is append-only, so repeated runs with the same log
// directory extend the history instead of erasing it.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// Growable sequence of per-batch values, reduced to a mean on demand.
///
/// One accumulator per tracked quantity; both are replaced with fresh
/// instances at the start of every epoch, so `len()` always equals the
/// number of batches processed so far in the current epoch.
#[derive(Debug, Default)]
pub struct RunningMean {
    values: Vec<f64>,
}

impl RunningMean {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Record one batch's value.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Mean of everything pushed so far. An empty accumulator reads 0.0.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Number of batches recorded so far this epoch.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean cross-entropy loss over the epoch's batches. Always >= 0.
    pub loss: f64,

    /// Mean batch accuracy over the epoch's batches. Range: [0.0, 1.0]
    pub acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: f64, acc: f64) -> Self {
        Self { epoch, loss, acc }
    }
}

/// Logs epoch metrics to a CSV file for later plotting.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger rooted at `dir`.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir: PathBuf = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a brand-new file, so appending across runs
        // keeps a single header line at the top.
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,loss,acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.loss, m.acc)?;

        tracing::debug!(
            "Logged epoch {} metrics: loss={:.4}, acc={:.4}",
            m.epoch,
            m.loss,
            m.acc,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_tracks_batch_count() {
        let mut r = RunningMean::new();
        assert!(r.is_empty());

        r.push(2.0);
        r.push(4.0);
        r.push(6.0);

        // len must equal the number of pushes
        assert_eq!(r.len(), 3);
        assert!((r.mean() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_running_mean_empty_reads_zero() {
        let r = RunningMean::new();
        assert_eq!(r.mean(), 0.0);
    }

    #[test]
    fn test_accuracy_mean_stays_in_unit_interval() {
        let mut r = RunningMean::new();
        // Per-batch accuracies are fractions, so their mean must be too
        for a in [0.0, 0.25, 0.5, 1.0] {
            r.push(a);
        }
        let m = r.mean();
        assert!((0.0..=1.0).contains(&m));
    }

    #[test]
    fn test_csv_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();

        logger.log(&EpochMetrics::new(1, 0.5, 0.8)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.3, 0.9)).unwrap();

        // Re-opening the same directory must not add a second header
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(3, 0.2, 0.95)).unwrap();

        let text = std::fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "epoch,loss,acc");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1,0.500000"));
        assert!(lines[3].starts_with("3,0.200000"));
    }
}
