use super::{AdvisoryRule, RuleContext};
use crate::models::{Advice, Feature, Topic};

/// Threshold check on a single sensor value.
///
/// Low and high readings produce a warning with corrective advice; anything
/// between the cutoffs (inclusive) is reported as normal.
pub struct SensorRule {
    feature: Feature,
}

impl SensorRule {
    pub fn new(feature: Feature) -> Self {
        Self { feature }
    }
}

impl AdvisoryRule for SensorRule {
    fn topic(&self) -> Topic {
        match self.feature {
            Feature::Temperature => Topic::Temperature,
            Feature::Humidity => Topic::Humidity,
            Feature::Ph => Topic::Ph,
            Feature::Moisture => Topic::Moisture,
        }
    }

    fn name(&self) -> &'static str {
        match self.feature {
            Feature::Temperature => "Temperature Range",
            Feature::Humidity => "Humidity Range",
            Feature::Ph => "Soil pH Range",
            Feature::Moisture => "Soil Moisture Range",
        }
    }

    fn respond(&self, ctx: &RuleContext<'_>) -> Advice {
        let value = ctx.reading.get(self.feature);
        let thresholds = ctx.thresholds.for_feature(self.feature);
        let level = thresholds.classify(value);

        tracing::debug!(
            "{}: {} -> {:?} (low {}, high {})",
            self.name(),
            value,
            level,
            thresholds.low,
            thresholds.high
        );

        Advice::new(self.topic(), level.severity(), thresholds.message(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::thresholds::ThresholdTable;
    use crate::ml::VerdictSource;
    use crate::models::{Reading, Severity, Verdict};

    struct NoModel;

    impl VerdictSource for NoModel {
        fn verdict(&self, _reading: &Reading) -> Verdict {
            Verdict::new("unused", 0.0)
        }
    }

    fn respond(feature: Feature, reading: Reading, table: &ThresholdTable) -> Advice {
        let ctx = RuleContext {
            reading: &reading,
            thresholds: table,
            predictor: &NoModel,
        };
        SensorRule::new(feature).respond(&ctx)
    }

    #[test]
    fn hot_dry_acidic_field() {
        let table = ThresholdTable::standard();
        let reading = Reading::new(45.0, 30.0, 5.0, 20.0);

        let t = respond(Feature::Temperature, reading, &table);
        assert_eq!(t.topic, Topic::Temperature);
        assert_eq!(t.severity, Severity::Warning);
        assert!(t.message.contains("too high"));

        assert!(respond(Feature::Humidity, reading, &table).message.contains("too low"));
        assert!(respond(Feature::Ph, reading, &table).message.contains("too acidic"));
        assert!(respond(Feature::Moisture, reading, &table).message.contains("too low"));
    }

    #[test]
    fn boundary_values_are_normal() {
        let table = ThresholdTable::standard();
        let advice = respond(Feature::Temperature, Reading::new(20.0, 60.0, 6.5, 50.0), &table);
        assert_eq!(advice.severity, Severity::Info);
        assert_eq!(advice.message, "Temperature is 20°C - Normal range for rice.");

        let strict = ThresholdTable::strict();
        let advice = respond(Feature::Temperature, Reading::new(35.0, 60.0, 6.5, 50.0), &strict);
        assert!(advice.message.contains("Normal"));
    }
}
