use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{log_softmax, relu},
};

use crate::domain::digit_image::IMAGE_PIXELS;
use crate::domain::prediction::NUM_CLASSES;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct MlpClassifierConfig {
    /// Width of the first hidden layer
    #[config(default = 256)]
    pub hidden1: usize,

    /// Width of the second hidden layer
    #[config(default = 128)]
    pub hidden2: usize,

    /// Width of the third hidden layer
    #[config(default = 64)]
    pub hidden3: usize,

    /// Dropout probability between layers. 0 disables dropout
    /// without changing the module tree, so checkpoints trained
    /// with and without regularisation stay interchangeable.
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl MlpClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpClassifier<B> {
        MlpClassifier {
            fc1:     LinearConfig::new(IMAGE_PIXELS, self.hidden1).init(device),
            fc2:     LinearConfig::new(self.hidden1, self.hidden2).init(device),
            fc3:     LinearConfig::new(self.hidden2, self.hidden3).init(device),
            output:  LinearConfig::new(self.hidden3, NUM_CLASSES).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// Feedforward digit classifier: 784 → hidden1 → hidden2 → hidden3 → 10.
/// Each hidden layer is followed by ReLU then dropout; the output layer
/// is followed by log-softmax so the forward pass yields log-probabilities.
#[derive(Module, Debug)]
pub struct MlpClassifier<B: Backend> {
    pub fc1:     Linear<B>,
    pub fc2:     Linear<B>,
    pub fc3:     Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> MlpClassifier<B> {
    /// images: [batch, 784] in [0, 1] → log-probabilities: [batch, 10]
    ///
    /// Dropout only masks activations on an autodiff backend, so the
    /// same forward code serves training and evaluation — calling
    /// .valid() on the model is what "switches off" regularisation.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(images));
        let x = self.dropout.forward(x);

        let x = relu(self.fc2.forward(x));
        let x = self.dropout.forward(x);

        let x = relu(self.fc3.forward(x));
        let x = self.dropout.forward(x);

        let logits = self.output.forward(x);

        // Log-softmax over the class dimension. Inference recovers
        // plain probabilities with exp(); training consumes the
        // log-probabilities directly in the NLL loss below.
        log_softmax(logits, 1)
    }

    /// Negative-log-likelihood loss over a batch.
    ///
    /// The forward pass already produces log-probabilities, so the
    /// loss is just the mean of the target classes' log-probabilities,
    /// negated: gather log p[target] per row, average, flip sign.
    ///
    /// Returns the scalar loss and the log-probabilities so callers
    /// can reuse the forward output for accuracy bookkeeping.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let log_probs = self.forward(images);

        // gather(1, [batch, 1]) picks each row's target log-probability
        let target_log_probs = log_probs
            .clone()
            .gather(1, targets.unsqueeze_dim::<2>(1));

        let loss = target_log_probs.mean().neg();
        (loss, log_probs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// Run on the NdArray backend: forward-pass shape and distribution
// properties are deterministic even with random weights.
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    fn test_model() -> MlpClassifier<TestBackend> {
        MlpClassifierConfig::new().init(&NdArrayDevice::Cpu)
    }

    #[test]
    fn test_forward_output_shape() {
        let model  = test_model();
        let images = Tensor::<TestBackend, 2>::zeros([3, IMAGE_PIXELS], &NdArrayDevice::Cpu);
        let out    = model.forward(images);
        assert_eq!(out.dims(), [3, NUM_CLASSES]);
    }

    #[test]
    fn test_forward_yields_log_probabilities() {
        let model  = test_model();
        let images = Tensor::<TestBackend, 2>::ones([2, IMAGE_PIXELS], &NdArrayDevice::Cpu);

        let probs: Vec<f32> = model
            .forward(images)
            .exp()
            .into_data()
            .to_vec()
            .unwrap();

        // Each row of exp(log_softmax(x)) must be a distribution
        for row in probs.chunks(NUM_CLASSES) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "row sums to {sum}");
            assert!(row.iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn test_loss_is_positive_scalar() {
        let model   = test_model();
        let images  = Tensor::<TestBackend, 2>::ones([4, IMAGE_PIXELS], &NdArrayDevice::Cpu);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3].as_slice(), &NdArrayDevice::Cpu,
        );

        let (loss, log_probs) = model.forward_loss(images, targets);
        assert_eq!(loss.dims(), [1]);
        assert_eq!(log_probs.dims(), [4, NUM_CLASSES]);

        // NLL of a proper distribution is non-negative
        let value: f32 = loss.into_data().to_vec().unwrap()[0];
        assert!(value >= 0.0, "loss was {value}");
    }

    #[test]
    fn test_zero_dropout_config_builds_same_module_tree() {
        // --dropout 0 must not change the architecture, only disable
        // the masking, so both variants load the same checkpoints
        let with    = MlpClassifierConfig::new();
        let without = MlpClassifierConfig::new().with_dropout(0.0);
        assert_eq!(with.hidden1, without.hidden1);
        assert_eq!(with.hidden2, without.hidden2);
        assert_eq!(with.hidden3, without.hidden3);
    }
}
