// ============================================================
// Training Loop
// ============================================================
// Manual epoch/batch loop over shuffled digit batches using
// Burn's DataLoader and Adam.
//
// Per batch: forward pass, softmax for the accuracy readout
// only (the loss consumes the raw scores), backward pass, Adam
// update, then one progress line showing the running means.
//
// Per epoch: one CSV metrics row and one checkpoint pair. The
// loop never validates, never early-stops, and never adjusts
// the learning rate.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{
        dataloader::DataLoaderBuilder,
        dataset::{vision::MnistItem, Dataset},
    },
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::softmax, backend::AutodiffBackend},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::MnistBatcher;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger, RunningMean};
use crate::ml::model::Net;

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Seed the backend, pick the device and run the training session.
pub fn run_training(
    cfg:     &TrainConfig,
    dataset: impl Dataset<MnistItem> + 'static,
    ckpt:    &CheckpointManager,
    metrics: &MetricsLogger,
) -> Result<()> {
    // One seed drives weight initialization, dropout masks and,
    // through the loader below, the shuffle order
    TrainBackend::seed(cfg.seed);

    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);

    train_loop::<TrainBackend, _>(cfg, dataset, ckpt, metrics, device)
}

fn train_loop<B, D>(
    cfg:     &TrainConfig,
    dataset: D,
    ckpt:    &CheckpointManager,
    metrics: &MetricsLogger,
    device:  B::Device,
) -> Result<()>
where
    B: AutodiffBackend,
    D: Dataset<MnistItem> + 'static,
{
    let num_items   = dataset.len();
    let num_batches = num_items.div_ceil(cfg.batch_size);
    tracing::info!("Training on {} samples ({} batches/epoch)", num_items, num_batches);

    // ── Model and optimizer ───────────────────────────────────────────────────
    let mut model = Net::<B>::new(&device);

    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    let mut start_epoch = 1;
    if cfg.resume {
        let (restored_model, restored_optim, last_epoch) =
            ckpt.restore(model, optim, &device)?;
        model = restored_model;
        optim = restored_optim;
        start_epoch = last_epoch + 1;
        tracing::info!("Resumed checkpoint of epoch {}, continuing at {}", last_epoch, start_epoch);
    }

    // ── Data loader ───────────────────────────────────────────────────────────
    // Reshuffles with the configured seed at each pass; no worker
    // threads, so batch construction stays on the training thread.
    let batcher = MnistBatcher::<B>::new(device.clone());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(dataset);

    let loss_fn = CrossEntropyLossConfig::new().init(&device);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in start_epoch..=cfg.epochs {
        let mut running_loss = RunningMean::new();
        let mut running_acc  = RunningMean::new();

        for (iteration, batch) in loader.iter().enumerate() {
            let scores = model.forward(batch.images);

            // Probabilities feed the accuracy readout only; the loss
            // operates on the raw scores
            let probs = softmax(scores.clone(), 1);
            let loss  = loss_fn.forward(scores, batch.targets.clone());

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            let acc = batch_accuracy(probs, batch.targets);

            // Backward pass + Adam update. Each backward builds a fresh
            // gradient container, so there is nothing to zero between
            // batches.
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);

            running_loss.push(loss_val);
            running_acc.push(acc);

            println!(
                "Train: Epoch {:04}/{:04} | Batch {:04}/{:04} | Loss {:.4} | Acc {:.4}",
                epoch,
                cfg.epochs,
                iteration + 1,
                num_batches,
                running_loss.mean(),
                running_acc.mean(),
            );
        }

        let epoch_metrics = EpochMetrics::new(epoch, running_loss.mean(), running_acc.mean());
        metrics.log(&epoch_metrics)?;
        tracing::info!(
            "Epoch {:04}/{:04} done: loss={:.4} acc={:.4}",
            epoch,
            cfg.epochs,
            epoch_metrics.loss,
            epoch_metrics.acc,
        );

        ckpt.save(&model, &optim, epoch)?;
    }

    tracing::info!("Training complete!");
    Ok(())
}

/// Fraction of samples whose arg-max class matches the target.
pub fn batch_accuracy<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> f64 {
    let batch_size = targets.dims()[0];

    // argmax(1) returns shape [batch, 1]; squeeze to [batch]
    // before comparing with the targets
    let predicted = probs.argmax(1).flatten::<1>(0, 1);

    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    correct as f64 / batch_size as f64
}
