// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - MnistSource implements DigitSource
//   - A future folder-of-PNGs loader could also implement it
//   - The application layer only sees DigitSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::digit_image::DigitImage;
use crate::domain::prediction::Prediction;

// ─── DigitSource ──────────────────────────────────────────────────────────────
/// Any component that can fetch labelled digit images by index.
///
/// Implementations:
///   - MnistSource → fetches from the framework's MNIST test split
///   - (future) PngFolderSource → loads user-supplied images
pub trait DigitSource {
    /// Fetch the image at `index`, or an error if out of range.
    fn digit(&self, index: usize) -> Result<DigitImage>;

    /// Number of images available from this source.
    fn count(&self) -> usize;
}

// ─── DigitClassifier ──────────────────────────────────────────────────────────
/// Any component that can classify a digit image.
///
/// Implementations:
///   - Inferencer → runs the trained feedforward model
///   - (future) RandomBaseline → uniform guessing, for comparison
pub trait DigitClassifier {
    /// Produce a probability distribution over the ten classes.
    fn classify(&self, image: &DigitImage) -> Result<Prediction>;
}
