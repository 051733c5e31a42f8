// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::domain::digit_image::{DigitImage, IMAGE_PIXELS};
use crate::domain::prediction::Prediction;
use crate::domain::traits::DigitClassifier;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::MlpClassifier;

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model:  MlpClassifier<InferBackend>,
    device: burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Rebuild the trained model from a checkpoint directory.
    ///
    /// The architecture comes from the persisted training config —
    /// never from CLI defaults — so the weights always fit. Dropout
    /// is forced to 0: inference must be deterministic.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        let model: MlpClassifier<InferBackend> = cfg
            .model_config()
            .with_dropout(0.0)
            .init(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Forward one image and return the ten class probabilities.
    fn predict(&self, image: &DigitImage) -> Result<Prediction> {
        // Same [0, 1] scaling the training batcher applies
        let pixels = image.normalized();

        let input = Tensor::<InferBackend, 1>::from_floats(
            pixels.as_slice(), &self.device,
        )
        .reshape([1, IMAGE_PIXELS]);

        // Forward pass yields log-probabilities; exp() undoes the log
        let probabilities: Vec<f32> = self
            .model
            .forward(input)
            .exp()
            .into_data()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read model output: {e:?}"))?;

        let prediction = Prediction::new(
            probabilities.iter().map(|p| *p as f64).collect(),
        );

        tracing::debug!(
            "Predicted digit {} with confidence {:.4}",
            prediction.predicted_class(),
            prediction.confidence(),
        );

        Ok(prediction)
    }
}

impl DigitClassifier for Inferencer {
    fn classify(&self, image: &DigitImage) -> Result<Prediction> {
        self.predict(image)
    }
}
