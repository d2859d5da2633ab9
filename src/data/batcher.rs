// ============================================================
// MNIST Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<MnistItem>
// into device-ready tensors.
//
// How batching works here:
//   Input:  Vec of N MnistItems, each a 28×28 image + label
//   Output: MnistBatch with images [N, 28, 28] and targets [N]
//
//   All pixels are flattened into one Vec<f32>, turned into a
//   1D tensor on the target device, then reshaped to [N, 28, 28].
//
// Normalization contract:
//   MnistItem stores raw intensities 0..=255. Each pixel is
//   scaled to [0, 1] and then mapped through the fixed affine
//   transform (x - MEAN) / STD with MEAN = STD = 0.5, so the
//   model always sees values in [-1, 1].
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::{dataloader::batcher::Batcher, dataset::vision::MnistItem},
    prelude::*,
};

/// Pixel mean and spread used by the affine normalization,
/// applied after scaling raw intensities to [0, 1].
const PIXEL_MEAN: f32 = 0.5;
const PIXEL_STD: f32 = 0.5;

// ─── MnistBatch ───────────────────────────────────────────────────────────────
/// A batch of digit images ready for the model forward pass.
///
/// Generic over the Burn backend B so the same batcher
/// works on any device.
#[derive(Debug, Clone)]
pub struct MnistBatch<B: Backend> {
    /// Normalized images — shape: [batch_size, 28, 28]
    pub images: Tensor<B, 3>,

    /// Ground truth digit classes — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── MnistBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created where the model lives.
#[derive(Clone, Debug)]
pub struct MnistBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> MnistBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<MnistItem, MnistBatch<B>> for MnistBatcher<B> {
    /// Convert a Vec of MnistItems into a single MnistBatch.
    ///
    /// Steps:
    ///   1. Flatten all pixel rows into one Vec<f32>
    ///   2. Create a 1D tensor from the flat Vec on the device
    ///   3. Reshape to [batch_size, 28, 28]
    ///   4. Normalize to [-1, 1]
    ///   5. Create the 1D target tensor from the labels
    fn batch(&self, items: Vec<MnistItem>) -> MnistBatch<B> {
        let batch_size = items.len();

        // ── Flatten pixels ────────────────────────────────────────────────────
        // Row-major over samples, then rows, then columns
        let pixels_flat: Vec<f32> = items
            .iter()
            .flat_map(|item| item.image.iter().flatten().copied())
            .collect();

        // ── Collect labels ────────────────────────────────────────────────────
        let labels: Vec<i32> = items.iter().map(|item| item.label as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let images = Tensor::<B, 1>::from_floats(pixels_flat.as_slice(), &self.device)
            .reshape([batch_size, 28, 28]);

        // Scale raw 0..=255 intensities to [0, 1], then center and spread
        let images = ((images / 255) - PIXEL_MEAN) / PIXEL_STD;

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        MnistBatch { images, targets }
    }
}
