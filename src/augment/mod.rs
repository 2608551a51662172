// src/augment/mod.rs
//! Data augmentation for ECG training sets.
//!
//! Transforms are label-preserving and length-preserving, driven by a
//! seedable RNG so experiments stay reproducible.

pub mod pipeline;
pub mod transforms;

pub use pipeline::{AugmentationStep, DatasetAugmenter};
pub use transforms::{roll, Augmenter};
