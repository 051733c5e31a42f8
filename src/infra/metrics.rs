// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Why log metrics to CSV?
//   - Easy to open in Excel or Google Sheets
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average NLL loss on the training set
//   - test_loss:  average NLL loss on the test set
//   - test_acc:   fraction of test images classified correctly
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,test_loss,test_acc
//   1,0.512400,0.438200,0.871300
//   2,0.384100,0.395400,0.884600
//   ...
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If test_loss increases while train_loss decreases → overfitting,
//     which is exactly what dropout is meant to reduce
//   - Accuracy should increase each epoch
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average negative-log-likelihood loss over all training batches
    /// Lower is better. Random initialisation gives ~ln(10) ≈ 2.30
    pub train_loss: f64,

    /// Average negative-log-likelihood loss on the test set
    /// Should track train_loss — divergence indicates overfitting
    pub test_loss: f64,

    /// Fraction of test images whose argmax matches the label
    /// Range: [0.0, 1.0] — 1.0 means perfect classification
    pub test_acc: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(epoch: usize, train_loss: f64, test_loss: f64, test_acc: f64) -> Self {
        Self { epoch, train_loss, test_loss, test_acc }
    }

    /// Returns true if this epoch improved over the previous best test_loss
    pub fn is_improvement(&self, best_test_loss: f64) -> bool {
        self.test_loss < best_test_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());

        // Create directory if it doesn't exist
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write CSV header only if file is new
        // This allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            // Write the header row
            writeln!(f, "epoch,train_loss,test_loss,test_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    ///
    /// Uses OpenOptions with append=true so we add to the file
    /// without overwriting previous epochs.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        // Open in append mode — adds to end of file
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        // Write one CSV row with 6 decimal places for each metric
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.test_loss,
            m.test_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.test_loss,
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
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.45, 0.41, 0.88);
        // 0.41 < 0.50 → this is an improvement
        assert!(m.is_improvement(0.50));
        // 0.41 is NOT less than 0.40 → not an improvement
        assert!(!m.is_improvement(0.40));
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let dir = std::env::temp_dir().join("digit-classifier-metrics-test");
        // Fresh directory per run so the header check is meaningful
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_str().unwrap()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.4, 0.9)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.3, 0.35, 0.92)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "epoch,train_loss,test_loss,test_acc");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));

        let _ = fs::remove_dir_all(&dir);
    }
}
