// ============================================================
// Layer 4 — MNIST Source
// ============================================================
// Exposes the MNIST dataset through Burn's dataset utility.
//
// How the dataset arrives:
//   Burn's MnistDataset downloads the four IDX files on first
//   use, caches them, and decodes each image into a 28×28 array
//   of floats with a u8 label. We never touch the wire format.
//
// This module does two jobs:
//   1. Hand the train/test splits to the training loop, which
//      consumes them through Burn's DataLoader.
//   2. Convert single items into domain DigitImages for the
//      inference path, which works without framework types.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Result};
use burn::data::dataset::{
    vision::{MnistDataset, MnistItem},
    Dataset,
};

use crate::domain::digit_image::DigitImage;
use crate::domain::traits::DigitSource;

/// Which half of the canonical MNIST split to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// 60,000 images used for parameter updates
    Train,
    /// 10,000 held-out images used for validation and inference
    Test,
}

/// Lazily constructed handle on one MNIST split.
/// Implements the DigitSource trait from Layer 3.
pub struct MnistSource {
    dataset: MnistDataset,
    split:   Split,
}

impl MnistSource {
    /// Open the given split. Triggers the framework's download on
    /// first use, which is why construction can take a moment.
    pub fn new(split: Split) -> Self {
        tracing::info!("Opening MNIST {:?} split (downloads on first use)", split);
        let dataset = match split {
            Split::Train => MnistDataset::train(),
            Split::Test  => MnistDataset::test(),
        };
        tracing::info!("MNIST {:?} split ready: {} images", split, dataset.len());
        Self { dataset, split }
    }

    /// The underlying Burn dataset, consumed by DataLoaderBuilder.
    pub fn into_dataset(self) -> MnistDataset {
        self.dataset
    }
}

impl DigitSource for MnistSource {
    fn digit(&self, index: usize) -> Result<DigitImage> {
        let Some(item) = self.dataset.get(index) else {
            bail!(
                "Index {} is out of range: the {:?} split has {} images",
                index,
                self.split,
                self.dataset.len()
            );
        };
        Ok(to_digit_image(&item))
    }

    fn count(&self) -> usize {
        self.dataset.len()
    }
}

/// Flatten a framework item into a domain DigitImage.
/// The 28×28 array becomes a row-major Vec, pixel values stay
/// raw in [0, 255] — scaling happens where tensors are built.
fn to_digit_image(item: &MnistItem) -> DigitImage {
    let pixels: Vec<f32> = item
        .image
        .iter()
        .flat_map(|row| row.iter().copied())
        .collect();

    DigitImage::new(pixels, Some(item.label))
}
