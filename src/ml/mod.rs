//! Supervised irrigation model: label encoding, stratified split, feature
//! scaling and a gradient-boosted tree ensemble.

pub mod boosting;
pub mod classifier;
pub mod encoder;
pub mod metrics;
pub mod scaler;
pub mod split;
pub mod tree;

pub use classifier::{IrrigationClassifier, VerdictSource};

pub const N_FEATURES: usize = 4;

/// Feature vector in training order: temperature, humidity, pH, moisture.
pub type FeatureRow = [f64; N_FEATURES];
