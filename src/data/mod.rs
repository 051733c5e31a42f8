// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw MNIST dataset
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   MNIST dataset (downloaded + cached by Burn)
//       │
//       ▼
//   MnistSource       → exposes train/test splits, converts
//       │               items to domain DigitImages
//       ▼
//   MnistBatcher      → stacks samples into tensor batches,
//       │               scales pixels to [0, 1]
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Note what is NOT here: downloading, caching and decoding the
// dataset files is entirely the framework's job. This layer
// only adapts the framework's items to our domain and tensors.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Wraps Burn's MNIST dataset and converts items to domain types
pub mod loader;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
