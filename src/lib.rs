//! Convolutional MNIST digit classifier built on Burn.
//!
//! The crate is split into layers:
//! - [`cli`] parses arguments and routes to a use case
//! - [`application`] wires configs, datasets and infrastructure together
//! - [`ml`] holds the network, the training loop and the evaluator
//! - [`data`] batches raw images into normalized tensors
//! - [`infra`] persists checkpoints and metrics to disk

#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod data;
pub mod infra;
pub mod ml;
