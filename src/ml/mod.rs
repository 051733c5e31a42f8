// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data layer's batcher.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a GPU
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs     — The feedforward classifier architecture
//                  Four fully-connected layers with:
//                  • ReLU activations after each hidden layer
//                  • Dropout between layers (optional)
//                  • Log-softmax over the class dimension
//
//   trainer.rs   — The training loop
//                  Handles forward pass, loss computation,
//                  backward pass, optimiser step, per-epoch
//                  validation, metrics and checkpoint saving
//
//   inferencer.rs — The inference engine
//                  Loads a checkpoint, normalises one image,
//                  runs the model, returns class probabilities
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Srivastava et al. (2014) Dropout
//            Kingma & Ba (2015) Adam

/// Feedforward digit classifier architecture
pub mod model;

/// Full training loop with validation, metrics and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts digit probabilities
pub mod inferencer;
