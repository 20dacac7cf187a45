use super::{AdvisoryRule, RuleContext};
use crate::models::{Advice, Severity, Topic};

/// Irrigation questions are answered by the trained classifier rather than
/// fixed cutoffs.
pub struct IrrigationRule;

impl AdvisoryRule for IrrigationRule {
    fn topic(&self) -> Topic {
        Topic::Irrigation
    }

    fn name(&self) -> &'static str {
        "Irrigation Model"
    }

    fn respond(&self, ctx: &RuleContext<'_>) -> Advice {
        let verdict = ctx.predictor.verdict(ctx.reading);
        let needed = verdict.is_positive();

        let mut message = format!(
            "Model prediction for your readings: {} (accuracy {:.2}%).",
            verdict.headline(),
            verdict.accuracy_percent()
        );

        let thresholds = ctx.thresholds;
        if thresholds.moisture.is_low(ctx.reading.moisture) {
            message.push_str(" Soil moisture is below the safe range.");
        }
        if thresholds.temperature.is_high(ctx.reading.temperature) {
            message.push_str(" High temperature increases water demand.");
        }

        let severity = if needed {
            Severity::Warning
        } else {
            Severity::Info
        };
        Advice::new(Topic::Irrigation, severity, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::thresholds::ThresholdTable;
    use crate::ml::VerdictSource;
    use crate::models::{Reading, Verdict};

    struct Fixed(&'static str);

    impl VerdictSource for Fixed {
        fn verdict(&self, _reading: &Reading) -> Verdict {
            Verdict::new(self.0, 0.9)
        }
    }

    #[test]
    fn reports_model_prediction() {
        let table = ThresholdTable::standard();
        let reading = Reading::new(45.0, 30.0, 5.0, 20.0);
        let ctx = RuleContext {
            reading: &reading,
            thresholds: &table,
            predictor: &Fixed("yes"),
        };
        let advice = IrrigationRule.respond(&ctx);
        assert_eq!(advice.severity, Severity::Warning);
        assert!(advice.message.contains("Irrigation Needed: YES"));
        assert!(advice.message.contains("90.00%"));
        assert!(advice.message.contains("below the safe range"));
        assert!(advice.message.contains("water demand"));
    }

    #[test]
    fn no_irrigation_is_info() {
        let table = ThresholdTable::standard();
        let reading = Reading::new(28.0, 70.0, 6.5, 55.0);
        let ctx = RuleContext {
            reading: &reading,
            thresholds: &table,
            predictor: &Fixed("no"),
        };
        let advice = IrrigationRule.respond(&ctx);
        assert_eq!(advice.severity, Severity::Info);
        assert!(advice.message.contains("Irrigation Needed: NO"));
        assert!(!advice.message.contains("safe range"));
    }
}
