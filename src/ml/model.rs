use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Relu,
    },
    prelude::*,
};

/// Fixed-topology convolutional digit classifier.
///
/// Two conv+pool+ReLU stages feed two fully-connected stages, with
/// dropout after the second convolution and after the first linear.
/// There are no architecture hyperparameters, so construction takes
/// only a device.
#[derive(Module, Debug)]
pub struct Net<B: Backend> {
    conv1:        Conv2d<B>,
    conv2:        Conv2d<B>,
    pool1:        MaxPool2d,
    pool2:        MaxPool2d,
    dropout_conv: Dropout,
    fc1:          Linear<B>,
    fc2:          Linear<B>,
    dropout_fc:   Dropout,
    activation:   Relu,
}

impl<B: Backend> Net<B> {
    pub fn new(device: &B::Device) -> Self {
        Self {
            conv1:        Conv2dConfig::new([1, 10], [5, 5]).init(device),
            conv2:        Conv2dConfig::new([10, 20], [5, 5]).init(device),
            // Burn's pool strides default to [1, 1]; set them to the
            // kernel size for the usual halving pool
            pool1:        MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            pool2:        MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            dropout_conv: DropoutConfig::new(0.5).init(),
            fc1:          LinearConfig::new(320, 50).init(device),
            fc2:          LinearConfig::new(50, 10).init(device),
            dropout_fc:   DropoutConfig::new(0.5).init(),
            activation:   Relu::new(),
        }
    }

    /// images: [batch, 28, 28] → raw class scores: [batch, 10]
    ///
    /// Scores are unnormalized; the cross-entropy loss consumes them
    /// directly, and softmax is applied outside only when a probability
    /// distribution is needed.
    pub fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, height, width] = images.dims();

        // Convolution wants an explicit channel axis
        let x = images.reshape([batch_size, 1, height, width]);

        let x = self.conv1.forward(x);        // [batch, 10, 24, 24]
        let x = self.pool1.forward(x);        // [batch, 10, 12, 12]
        let x = self.activation.forward(x);

        let x = self.conv2.forward(x);        // [batch, 20, 8, 8]
        let x = self.dropout_conv.forward(x);
        let x = self.pool2.forward(x);        // [batch, 20, 4, 4]
        let x = self.activation.forward(x);

        let x = x.reshape([batch_size, 320]); // 20 channels × 4 × 4 pixels

        let x = self.fc1.forward(x);          // [batch, 50]
        let x = self.activation.forward(x);
        let x = self.dropout_fc.forward(x);

        self.fc2.forward(x)                   // [batch, 10]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use burn::tensor::Distribution;
    use serial_test::serial;

    type TestBackend = NdArray;

    // Weight initialization draws from the backend's global RNG, so
    // tests that build a Net run serially.

    #[test]
    #[serial]
    fn test_forward_shape() {
        let device = NdArrayDevice::default();
        let model = Net::<TestBackend>::new(&device);

        let images = Tensor::<TestBackend, 3>::zeros([2, 28, 28], &device);
        assert_eq!(model.forward(images).dims(), [2, 10]);
    }

    #[test]
    #[serial]
    fn test_single_all_zero_image() {
        // Degenerate batch: one blank image must still forward cleanly
        let device = NdArrayDevice::default();
        let model = Net::<TestBackend>::new(&device);

        let image = Tensor::<TestBackend, 3>::zeros([1, 28, 28], &device);
        let scores = model.forward(image);

        assert_eq!(scores.dims(), [1, 10]);
        assert!(scores.into_data().value.iter().all(|v| v.is_finite()));
    }

    #[test]
    #[serial]
    fn test_parameter_count() {
        let device = NdArrayDevice::default();
        let model = Net::<TestBackend>::new(&device);

        // conv1 260 + conv2 5020 + fc1 16050 + fc2 510
        assert_eq!(model.num_params(), 21840);
    }

    #[test]
    #[serial]
    fn test_seeded_init_is_reproducible() {
        let device = NdArrayDevice::default();

        TestBackend::seed(42);
        let a = Net::<TestBackend>::new(&device);
        TestBackend::seed(42);
        let b = Net::<TestBackend>::new(&device);

        let probe =
            Tensor::<TestBackend, 3>::random([2, 28, 28], Distribution::Default, &device);
        assert_eq!(
            a.forward(probe.clone()).into_data(),
            b.forward(probe).into_data()
        );
    }
}
