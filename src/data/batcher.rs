// ============================================================
// Layer 4 — MNIST Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<MnistItem>
// into GPU-ready tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into a single batch tensor. This is necessary because
//   GPUs are most efficient when processing many samples at once.
//
// How batching works here:
//   Input:  Vec of N MnistItems, each a 28×28 image + label
//   Output: MnistBatch with images [N, 784] and targets [N]
//
//   We flatten every image into one long Vec, then reshape:
//   [i1_p1, ..., i1_p784, i2_p1, ..., iN_p784] → [N, 784]
//
// Pixel scaling:
//   Raw intensities are in [0, 255]. We divide by 255 here so
//   the model always sees inputs in [0, 1] — inference applies
//   the same scaling through DigitImage::normalized().
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::{dataloader::batcher::Batcher, dataset::vision::MnistItem},
    prelude::*,
};

use crate::domain::digit_image::IMAGE_PIXELS;

// ─── MnistBatch ───────────────────────────────────────────────────────────────
/// A batch of digit images ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct MnistBatch<B: Backend> {
    /// Flattened images scaled to [0, 1] — shape: [batch_size, 784]
    pub images: Tensor<B, 2>,

    /// Ground-truth digit per image — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── MnistBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct MnistBatcher<B: Backend> {
    /// The device to create tensors on (e.g. GPU index 0)
    pub device: B::Device,
}

impl<B: Backend> MnistBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes MnistBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<MnistItem, MnistBatch<B>> for MnistBatcher<B> {
    /// Convert a Vec of MnistItems into a single MnistBatch.
    ///
    /// Steps:
    ///   1. Flatten all images into one Vec<f32>, scaling by 1/255
    ///   2. Create a 1D tensor from the flat Vec
    ///   3. Reshape to [batch_size, 784]
    ///   4. Create a 1D Int tensor for the labels
    fn batch(&self, items: Vec<MnistItem>) -> MnistBatch<B> {
        let batch_size = items.len();

        // ── Flatten images ────────────────────────────────────────────────────
        // We go from N 28×28 arrays to one Vec<f32> of N*784 values,
        // scaling each pixel to [0, 1] on the way
        let image_flat: Vec<f32> = items
            .iter()
            .flat_map(|item| item.image.iter().flat_map(|row| row.iter()))
            .map(|pixel| pixel / 255.0)
            .collect();

        // ── Collect labels ────────────────────────────────────────────────────
        // One scalar per sample (Burn uses i32 for Int tensors)
        let labels: Vec<i32> = items
            .iter()
            .map(|item| item.label as i32)
            .collect();

        // ── Create tensors ────────────────────────────────────────────────────
        // Tensor::from_floats creates a 1D tensor from a slice,
        // then .reshape() gives it the correct 2D shape [batch, 784]

        let images = Tensor::<B, 1>::from_floats(
            image_flat.as_slice(), &self.device
        ).reshape([batch_size, IMAGE_PIXELS]);

        // Targets stay as a 1D tensor [batch_size]
        let targets = Tensor::<B, 1, Int>::from_ints(
            labels.as_slice(), &self.device
        );

        MnistBatch { images, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// Tensor-touching tests run on the NdArray backend so no GPU is needed.
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    fn item(fill: f32, label: u8) -> MnistItem {
        MnistItem {
            image: [[fill; 28]; 28],
            label,
        }
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = MnistBatcher::<TestBackend>::new(NdArrayDevice::Cpu);
        let batch   = batcher.batch(vec![item(0.0, 3), item(255.0, 7)]);

        assert_eq!(batch.images.dims(),  [2, IMAGE_PIXELS]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_pixels_scaled_to_unit_range() {
        let batcher = MnistBatcher::<TestBackend>::new(NdArrayDevice::Cpu);
        let batch   = batcher.batch(vec![item(255.0, 0)]);

        let values: Vec<f32> = batch.images.into_data().to_vec().unwrap();
        // 255 scales to exactly 1.0
        assert!(values.iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_targets_preserve_labels() {
        let batcher = MnistBatcher::<TestBackend>::new(NdArrayDevice::Cpu);
        let batch   = batcher.batch(vec![item(0.0, 4), item(0.0, 9)]);

        let labels: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(labels, vec![4, 9]);
    }
}
