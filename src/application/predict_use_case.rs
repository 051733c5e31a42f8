// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// The inference half of the workflow:
//   1. Rebuild the trained model from its checkpoint
//   2. Fetch one image from the held-out test split
//      (a specific index, or a random one)
//   3. Classify it into a probability distribution
//   4. Render the image and the distribution — terminal
//      output plus PNG files in the output directory
//
// Reference: Burn Book §6 (Inference)

use anyhow::Result;

use crate::data::loader::{MnistSource, Split};
use crate::domain::traits::{DigitClassifier, DigitSource};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::visualizer::{ascii_digit, probability_chart, Visualizer};
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    test_source: MnistSource,
    inferencer:  Inferencer,
    visualizer:  Visualizer,
}

impl PredictUseCase {
    /// Wire up the inference pipeline. Fails early with an
    /// actionable message if no checkpoint has been trained yet.
    pub fn new(checkpoint_dir: String, out_dir: String) -> Result<Self> {
        let ckpt       = CheckpointManager::new(&checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt)?;

        Ok(Self {
            test_source: MnistSource::new(Split::Test),
            inferencer,
            visualizer: Visualizer::new(out_dir),
        })
    }

    /// Classify one test image and render the result.
    /// When `index` is None a random test image is chosen,
    /// which makes repeated runs a quick eyeball check of
    /// where the model is still wrong.
    pub fn predict(&self, index: Option<usize>) -> Result<()> {
        let index = match index {
            Some(i) => i,
            None => {
                use rand::Rng;
                rand::thread_rng().gen_range(0..self.test_source.count())
            }
        };

        let image      = self.test_source.digit(index)?;
        let prediction = self.inferencer.classify(&image)?;

        // ── Terminal rendering ────────────────────────────────────────────────
        println!("\nTest image #{index}:");
        println!("{}", ascii_digit(&image));
        println!("{}", probability_chart(&prediction));

        let predicted = prediction.predicted_class();
        match image.label {
            Some(label) => {
                let verdict = if prediction.is_correct(label) { "correct" } else { "WRONG" };
                println!(
                    "Predicted {} ({:.1}% confident) — actual {} → {}",
                    predicted,
                    prediction.confidence() * 100.0,
                    label,
                    verdict,
                );
            }
            None => {
                println!(
                    "Predicted {} ({:.1}% confident)",
                    predicted,
                    prediction.confidence() * 100.0,
                );
            }
        }

        // ── PNG rendering ─────────────────────────────────────────────────────
        let digit_png = self
            .visualizer
            .save_digit_png(&image, &format!("test_{index}"))?;
        let chart_png = self
            .visualizer
            .save_probability_png(&prediction, &format!("test_{index}_probs"))?;

        println!(
            "Saved renderings: {} and {}",
            digit_png.display(),
            chart_png.display(),
        );

        tracing::info!(
            "Classified test image #{} as {} (ink fraction {:.3})",
            index,
            predicted,
            image.ink_fraction(),
        );

        Ok(())
    }
}
