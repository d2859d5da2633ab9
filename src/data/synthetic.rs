// ============================================================
// Synthetic Digits
// ============================================================
// A tiny deterministic labeled dataset shaped exactly like
// MNIST (28×28 images, raw 0..=255 intensities, u8 labels).
// The end-to-end tests train on it instead of downloading the
// real dataset.
//
// Each image carries a bright two-row band whose vertical
// position encodes the class, over a low-intensity seeded
// noise background, so the classes are actually separable.
//
// Reference: Burn Book §4 (Custom Datasets)

use burn::data::dataset::{vision::MnistItem, Dataset};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// In-memory dataset of generated digit images.
pub struct SyntheticDigits {
    items: Vec<MnistItem>,
}

impl SyntheticDigits {
    /// Generate `count` samples whose labels cycle 0..=9.
    ///
    /// The same (count, seed) pair always produces identical pixel
    /// values, which is what makes reproducibility assertions on the
    /// training loop possible.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let items = (0..count)
            .map(|i| make_digit((i % 10) as u8, &mut rng))
            .collect();
        Self { items }
    }
}

impl Dataset<MnistItem> for SyntheticDigits {
    fn get(&self, index: usize) -> Option<MnistItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// One sample: noise background plus a class-positioned bright band
/// covering rows `2 + 2*label` and the row below it.
fn make_digit(label: u8, rng: &mut StdRng) -> MnistItem {
    let mut image = [[0.0f32; 28]; 28];
    let top = 2 + 2 * label as usize;

    for (row, pixels) in image.iter_mut().enumerate() {
        for pixel in pixels.iter_mut() {
            *pixel = if row == top || row == top + 1 {
                255.0
            } else {
                rng.gen_range(0.0..32.0)
            };
        }
    }

    MnistItem { image, label }
}
