use super::{AdvisoryRule, RuleContext};
use crate::models::{format_value, Advice, Severity, Topic};

/// Fertilizer guidance from soil pH, then soil moisture.
///
/// - pH below range: correct acidity with lime before feeding
/// - pH above range: use acidifying nitrogen and zinc
/// - Dry soil: irrigate before topdressing urea
/// - Waterlogged soil: delay and split nitrogen
/// - Otherwise: standard split-dose schedule
pub struct FertilizerRule;

impl AdvisoryRule for FertilizerRule {
    fn topic(&self) -> Topic {
        Topic::Fertilizer
    }

    fn name(&self) -> &'static str {
        "Fertilizer Guidance"
    }

    fn respond(&self, ctx: &RuleContext<'_>) -> Advice {
        let reading = ctx.reading;
        let t = ctx.thresholds;

        if t.ph.is_low(reading.ph) {
            return Advice::new(
                Topic::Fertilizer,
                Severity::Warning,
                format!(
                    "pH {} is acidic. Apply lime 2-3 weeks before fertilizing; \
                     nutrients such as phosphorus are poorly available in acidic soil.",
                    format_value(reading.ph)
                ),
            );
        }

        if t.ph.is_high(reading.ph) {
            return Advice::new(
                Topic::Fertilizer,
                Severity::Warning,
                format!(
                    "pH {} is alkaline. Prefer ammonium sulfate over urea and add zinc sulfate \
                     to prevent zinc deficiency.",
                    format_value(reading.ph)
                ),
            );
        }

        if t.moisture.is_low(reading.moisture) {
            return Advice::new(
                Topic::Fertilizer,
                Severity::Advisory,
                format!(
                    "Moisture {}% is low. Irrigate before topdressing urea to avoid \
                     nitrogen loss and root burn.",
                    format_value(reading.moisture)
                ),
            );
        }

        if t.moisture.is_high(reading.moisture) {
            return Advice::new(
                Topic::Fertilizer,
                Severity::Advisory,
                format!(
                    "Moisture {}% is high. Drain standing water first and split nitrogen \
                     into smaller doses to limit runoff.",
                    format_value(reading.moisture)
                ),
            );
        }

        Advice::info(
            Topic::Fertilizer,
            "Soil conditions are fine for feeding. Apply NPK in split doses: basal, \
             at tillering, and at panicle initiation.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::thresholds::ThresholdTable;
    use crate::ml::VerdictSource;
    use crate::models::{Reading, Verdict};

    struct NoModel;

    impl VerdictSource for NoModel {
        fn verdict(&self, _reading: &Reading) -> Verdict {
            Verdict::new("unused", 0.0)
        }
    }

    fn advise(reading: Reading) -> Advice {
        let table = ThresholdTable::standard();
        let ctx = RuleContext {
            reading: &reading,
            thresholds: &table,
            predictor: &NoModel,
        };
        FertilizerRule.respond(&ctx)
    }

    #[test]
    fn ph_takes_precedence_over_moisture() {
        let advice = advise(Reading::new(30.0, 60.0, 5.0, 10.0));
        assert!(advice.message.contains("lime"));
        assert_eq!(advice.severity, Severity::Warning);
    }

    #[test]
    fn alkaline_soil() {
        assert!(advise(Reading::new(30.0, 60.0, 8.1, 50.0))
            .message
            .contains("ammonium sulfate"));
    }

    #[test]
    fn moisture_branches() {
        assert!(advise(Reading::new(30.0, 60.0, 6.5, 10.0))
            .message
            .contains("Irrigate before"));
        assert!(advise(Reading::new(30.0, 60.0, 6.5, 90.0))
            .message
            .contains("Drain standing water"));
    }

    #[test]
    fn static_tip_when_all_normal() {
        let advice = advise(Reading::new(30.0, 60.0, 6.5, 50.0));
        assert_eq!(advice.severity, Severity::Info);
        assert!(advice.message.contains("split doses"));
    }
}
