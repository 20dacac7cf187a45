use super::{AdvisoryRule, RuleContext};
use crate::models::{format_value, Advice, Severity, Topic};

/// Pest pressure guidance keyed on soil moisture.
pub struct PestRule;

impl AdvisoryRule for PestRule {
    fn topic(&self) -> Topic {
        Topic::Pest
    }

    fn name(&self) -> &'static str {
        "Pest Pressure"
    }

    fn respond(&self, ctx: &RuleContext<'_>) -> Advice {
        let moisture = ctx.reading.moisture;
        let t = &ctx.thresholds.moisture;

        if t.is_high(moisture) {
            Advice::new(
                Topic::Pest,
                Severity::Warning,
                format!(
                    "Moisture {}% is high. Standing water favors golden apple snails and \
                     blast disease; drain periodically and hand-pick snail egg masses.",
                    format_value(moisture)
                ),
            )
        } else if t.is_low(moisture) {
            Advice::new(
                Topic::Pest,
                Severity::Advisory,
                format!(
                    "Moisture {}% is low. Drought-stressed plants attract thrips and \
                     mealybugs; restore moisture before considering pesticide.",
                    format_value(moisture)
                ),
            )
        } else {
            Advice::info(
                Topic::Pest,
                "Scout weekly for stem borers and brown planthoppers. Use light traps and \
                 spray pesticide only when counts pass the economic threshold.",
            )
        }
    }
}
