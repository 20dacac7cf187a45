pub mod rules;
pub mod thresholds;
pub mod topic;

pub use rules::AdvisoryEngine;
pub use thresholds::{Level, Preset, ThresholdTable, TopicThresholds};
