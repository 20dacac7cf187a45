pub mod engine;
pub mod fertilizer;
pub mod irrigation;
pub mod pest;
pub mod sensor;

pub use engine::AdvisoryEngine;

use super::thresholds::ThresholdTable;
use crate::ml::VerdictSource;
use crate::models::{Advice, Reading, Topic};

/// Everything a rule may consult when answering.
pub struct RuleContext<'a> {
    pub reading: &'a Reading,
    pub thresholds: &'a ThresholdTable,
    pub predictor: &'a dyn VerdictSource,
}

/// Trait for advisory rules, one per data-backed topic
pub trait AdvisoryRule: Send + Sync {
    /// Topic this rule answers
    fn topic(&self) -> Topic;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Answer a query about the current reading
    fn respond(&self, ctx: &RuleContext<'_>) -> Advice;
}
