// ============================================================
// Evaluator
// ============================================================
// Measures a trained model on a held-out split. Runs on the
// plain (non-autodiff) backend: dropout is inactive there and
// no gradient state is built, so the pass is deterministic and
// mutates nothing.
//
// Accumulation is weighted by actual batch length (the last
// batch of a split is usually short), so the reported accuracy
// is the exact fraction over the whole split.

use anyhow::{bail, Result};
use burn::{
    data::{
        dataloader::DataLoaderBuilder,
        dataset::{
            vision::{MnistDataset, MnistItem},
            Dataset,
        },
    },
    nn::loss::CrossEntropyLossConfig,
    prelude::*,
    tensor::activation::softmax,
};

use crate::data::batcher::MnistBatcher;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::Net;

type EvalBackend = burn::backend::NdArray;

/// Final figures for one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    /// Sample-weighted mean cross-entropy loss
    pub loss: f64,

    /// Fraction of samples classified correctly, in [0, 1]
    pub acc: f64,

    /// Number of samples seen
    pub samples: usize,
}

/// Load the latest checkpointed model and measure it on the MNIST
/// test split. Returns the checkpoint's epoch alongside the report.
pub fn run_evaluation(
    ckpt:       &CheckpointManager,
    batch_size: usize,
) -> Result<(usize, EvalReport)> {
    let device = burn::backend::ndarray::NdArrayDevice::default();

    let (model, epoch) = ckpt.load_model(Net::<EvalBackend>::new(&device), &device)?;
    tracing::info!("Evaluating checkpoint of epoch {} on the test split", epoch);

    let report = evaluate(&model, MnistDataset::test(), batch_size, device)?;
    Ok((epoch, report))
}

/// Stream `dataset` through `model` un-shuffled and accumulate
/// loss and accuracy totals.
pub fn evaluate<B: Backend>(
    model:      &Net<B>,
    dataset:    impl Dataset<MnistItem> + 'static,
    batch_size: usize,
    device:     B::Device,
) -> Result<EvalReport> {
    let num_items   = dataset.len();
    let num_batches = num_items.div_ceil(batch_size);

    let batcher = MnistBatcher::<B>::new(device.clone());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .build(dataset);

    let loss_fn = CrossEntropyLossConfig::new().init(&device);

    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut seen     = 0usize;

    for (iteration, batch) in loader.iter().enumerate() {
        let len = batch.targets.dims()[0];

        let scores = model.forward(batch.images);
        let probs  = softmax(scores.clone(), 1);
        let loss   = loss_fn.forward(scores, batch.targets.clone());

        loss_sum += loss.into_scalar().elem::<f64>() * len as f64;
        correct  += correct_count(probs, batch.targets);
        seen     += len;

        println!(
            "Eval: Batch {:04}/{:04} | Loss {:.4} | Acc {:.4}",
            iteration + 1,
            num_batches,
            loss_sum / seen as f64,
            correct as f64 / seen as f64,
        );
    }

    if seen == 0 {
        bail!("Evaluation dataset is empty");
    }

    Ok(EvalReport {
        loss:    loss_sum / seen as f64,
        acc:     correct as f64 / seen as f64,
        samples: seen,
    })
}

/// How many samples in the batch the model classified correctly.
fn correct_count<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let predicted = probs.argmax(1).flatten::<1>(0, 1);

    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    correct as usize
}
