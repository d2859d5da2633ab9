// ============================================================
// Data Pipeline
// ============================================================
// Everything between the raw dataset and the tensor batches
// the model consumes.
//
// The pipeline flows in this order:
//
//   MnistDataset (burn)
//       │            downloads + parses the dataset on first use
//       ▼
//   MnistBatcher      → normalizes pixels, stacks into tensors
//       │
//       ▼
//   DataLoader (burn) → shuffled mini-batches per epoch
//
// The dataset itself comes from burn::data::dataset::vision;
// this layer only adds the batching/normalization step and a
// synthetic stand-in dataset for tests.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Implements Burn's Batcher trait: pixel normalization + stacking
pub mod batcher;

/// Deterministic MNIST-shaped dataset for tests
pub mod synthetic;
