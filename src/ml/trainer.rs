// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key backend insight:
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns model on MyInnerBackend (Wgpu)
//   - Validation batcher must also use MyInnerBackend
//   - Dropout only masks on the autodiff backend, so validation
//     automatically runs with regularisation disabled
//   - argmax(1) returns [batch,1] so we squeeze before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::vision::MnistDataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::MnistBatcher;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::MlpClassifier;

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: MnistDataset,
    test_dataset:  MnistDataset,
    ckpt_manager:  CheckpointManager,
    metrics:       MetricsLogger,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, test_dataset, ckpt_manager, metrics, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: MnistDataset,
    test_dataset:  MnistDataset,
    ckpt_manager:  CheckpointManager,
    metrics:       MetricsLogger,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {

    // ── Seed the backend ──────────────────────────────────────────────────────
    // Fixes weight initialisation so runs are comparable; the loader's
    // shuffle takes the same seed below.
    MyBackend::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: MlpClassifier<MyBackend> = cfg.model_config().init(&device);
    tracing::info!(
        "Model ready: 784 → {} → {} → {} → 10, dropout={}",
        cfg.hidden1, cfg.hidden2, cfg.hidden3, cfg.dropout,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = MnistBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let test_batcher = MnistBatcher::<MyInnerBackend>::new(device.clone());
    let test_loader  = DataLoaderBuilder::new(test_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → MlpClassifier<MyInnerBackend>
        // no gradients are recorded and dropout is inactive
        let model_valid = model.valid();

        let mut test_loss_sum = 0.0f64;
        let mut test_batches  = 0usize;
        let mut correct       = 0usize;
        let mut total_samples = 0usize;

        for batch in test_loader.iter() {
            let (loss, log_probs) =
                model_valid.forward_loss(batch.images, batch.targets.clone());

            test_loss_sum += loss.into_scalar().elem::<f64>();
            test_batches  += 1;

            total_samples += batch.targets.dims()[0];
            correct       += num_correct(log_probs, batch.targets);
        }

        let avg_test_loss = if test_batches  > 0 { test_loss_sum / test_batches as f64 } else { f64::NAN };
        let test_acc      = if total_samples > 0 { correct as f64 / total_samples as f64 } else { 0.0 };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | test_loss={:.4} | test_acc={:.1}%",
            epoch, cfg.epochs, avg_train_loss, avg_test_loss, test_acc * 100.0,
        );

        metrics.log(&EpochMetrics::new(epoch, avg_train_loss, avg_test_loss, test_acc))?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}

/// Count how many rows of `log_probs` put their argmax on the target.
///
/// argmax(1) returns shape [batch, 1] — flatten to [batch] before
/// comparing with targets which is [batch].
fn num_correct<B: Backend>(
    log_probs: Tensor<B, 2>,
    targets:   Tensor<B, 1, Int>,
) -> usize {
    let predicted = log_probs.argmax(1).flatten::<1>(0, 1);

    let agreed: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    agreed as usize
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn test_num_correct_counts_argmax_hits() {
        let device = NdArrayDevice::Cpu;

        // Three samples over three "classes": rows 0 and 2 put their
        // largest log-probability on the target, row 1 does not.
        let log_probs = Tensor::<TestBackend, 1>::from_floats(
            [
                -0.1_f32, -3.0, -3.0, // argmax 0
                -0.1, -3.0, -3.0,     // argmax 0
                -3.0, -3.0, -0.1,     // argmax 2
            ]
            .as_slice(),
            &device,
        )
        .reshape([3, 3]);

        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 2, 2].as_slice(), &device,
        );

        assert_eq!(num_correct(log_probs, targets), 2);
    }

    #[test]
    fn test_num_correct_all_wrong() {
        let device = NdArrayDevice::Cpu;

        let log_probs = Tensor::<TestBackend, 1>::from_floats(
            [-0.1_f32, -3.0, -3.0, -0.1].as_slice(), &device,
        )
        .reshape([2, 2]);

        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            [1, 0].as_slice(), &device,
        );

        assert_eq!(num_correct(log_probs, targets), 0);
    }
}
