// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Open MNIST splits          (Layer 4 - data)
//   Step 2: Save config + metrics log  (Layer 6 - infra)
//   Step 3: Run training loop          (Layer 5 - ml)
//
// Compared to a text pipeline there is no cleaning, chunking
// or tokenisation here: the dataset arrives as ready-made
// labelled images from the framework's dataset utility.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::loader::{MnistSource, Split};
use crate::domain::traits::DigitSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::model::MlpClassifierConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for inference.
// The #[derive(Serialize, Deserialize)] macros from serde handle
// reading/writing this struct to JSON automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub hidden1:        usize,
    pub hidden2:        usize,
    pub hidden3:        usize,
    pub dropout:        f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     64,
            epochs:         10,
            lr:             3e-3,
            hidden1:        256,
            hidden2:        128,
            hidden3:        64,
            dropout:        0.2,
            seed:           42,
        }
    }
}

impl TrainConfig {
    /// The model architecture this run trains.
    /// Also used at inference time to rebuild the same model
    /// before loading checkpoint weights into it.
    pub fn model_config(&self) -> MlpClassifierConfig {
        MlpClassifierConfig::new()
            .with_hidden1(self.hidden1)
            .with_hidden2(self.hidden2)
            .with_hidden3(self.hidden3)
            .with_dropout(self.dropout)
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

        // ── Step 1: Open the MNIST splits ─────────────────────────────────────
        // The training split updates weights; the held-out test split
        // is evaluated after every epoch to watch for overfitting.
        let train_source = MnistSource::new(Split::Train);
        let test_source  = MnistSource::new(Split::Test);
        tracing::info!(
            "Datasets ready: {} training images, {} test images",
            train_source.count(),
            test_source.count(),
        );

        // ── Step 2: Save config for inference, open metrics log ───────────────
        // The inferencer needs to know the model architecture to rebuild it
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 3: Run training loop (Layer 5) ───────────────────────────────
        run_training(
            cfg,
            train_source.into_dataset(),
            test_source.into_dataset(),
            ckpt_manager,
            metrics,
        )?;

        Ok(())
    }
}
