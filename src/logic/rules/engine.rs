use super::{
    fertilizer::FertilizerRule, irrigation::IrrigationRule, pest::PestRule, sensor::SensorRule,
    AdvisoryRule, RuleContext,
};
use crate::logic::thresholds::ThresholdTable;
use crate::ml::VerdictSource;
use crate::models::{Advice, Feature, Reading, Topic};

pub const NO_READINGS_MESSAGE: &str =
    "Please enter field conditions and run 'Analyze Conditions' first.";
pub const HELP_MESSAGE: &str =
    "I can help based on your latest input. Ask about temperature, pH, moisture, humidity, \
     irrigation, fertilizer or pests!";
pub const GREETING_MESSAGE: &str = "Hello! Ask me about your current field conditions.";
pub const FAREWELL_MESSAGE: &str = "Goodbye! Good luck with the harvest.";

pub struct AdvisoryEngine {
    thresholds: ThresholdTable,
    rules: Vec<Box<dyn AdvisoryRule>>,
}

impl AdvisoryEngine {
    pub fn new(thresholds: ThresholdTable) -> Self {
        let rules: Vec<Box<dyn AdvisoryRule>> = vec![
            Box::new(SensorRule::new(Feature::Temperature)),
            Box::new(SensorRule::new(Feature::Humidity)),
            Box::new(SensorRule::new(Feature::Moisture)),
            Box::new(SensorRule::new(Feature::Ph)),
            Box::new(IrrigationRule),
            Box::new(FertilizerRule),
            Box::new(PestRule),
        ];

        Self { thresholds, rules }
    }

    /// Answer `query` against the current snapshot.
    ///
    /// Without a snapshot every query, whatever its topic, gets
    /// [`NO_READINGS_MESSAGE`]. Each call is independent: nothing is
    /// remembered between queries.
    pub fn respond(
        &self,
        snapshot: Option<&Reading>,
        query: &str,
        predictor: &dyn VerdictSource,
    ) -> Advice {
        // No snapshot: every query, small talk included, gets the same prompt
        let Some(reading) = snapshot else {
            tracing::debug!("Query {:?} before any analysis", query);
            return Advice::info(Topic::Help, NO_READINGS_MESSAGE);
        };

        let topic = Topic::resolve(query);
        tracing::debug!("Query {:?} resolved to {}", query, topic);

        match topic {
            Topic::Help => return Advice::info(Topic::Help, HELP_MESSAGE),
            Topic::Greeting => return Advice::info(Topic::Greeting, GREETING_MESSAGE),
            Topic::Farewell => return Advice::info(Topic::Farewell, FAREWELL_MESSAGE),
            _ => {}
        }

        let ctx = RuleContext {
            reading,
            thresholds: &self.thresholds,
            predictor,
        };

        match self.rules.iter().find(|r| r.topic() == topic) {
            Some(rule) => rule.respond(&ctx),
            None => {
                tracing::warn!("No rule registered for topic {}", topic);
                Advice::info(Topic::Help, HELP_MESSAGE)
            }
        }
    }

    /// Run every rule against `reading`, in registration order.
    pub fn evaluate_all(&self, reading: &Reading, predictor: &dyn VerdictSource) -> Vec<Advice> {
        let ctx = RuleContext {
            reading,
            thresholds: &self.thresholds,
            predictor,
        };
        self.rules.iter().map(|rule| rule.respond(&ctx)).collect()
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn list_rules(&self) -> Vec<(Topic, &'static str)> {
        self.rules.iter().map(|r| (r.topic(), r.name())).collect()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new(ThresholdTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use std::cell::Cell;

    /// Counts calls so tests can see when the model is consulted.
    struct CountingModel {
        label: &'static str,
        calls: Cell<usize>,
    }

    impl CountingModel {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                calls: Cell::new(0),
            }
        }
    }

    impl VerdictSource for CountingModel {
        fn verdict(&self, _reading: &Reading) -> Verdict {
            self.calls.set(self.calls.get() + 1);
            Verdict::new(self.label, 0.875)
        }
    }

    const ALL_QUERIES: [&str; 10] = [
        "temperature?",
        "humidity?",
        "moisture?",
        "ph?",
        "irrigation?",
        "fertilizer?",
        "pest?",
        "hello",
        "bye",
        "tell me a joke",
    ];

    #[test]
    fn without_snapshot_every_query_asks_for_readings() {
        let engine = AdvisoryEngine::default();
        let model = CountingModel::new("yes");
        for query in ALL_QUERIES {
            let advice = engine.respond(None, query, &model);
            assert_eq!(advice.message, NO_READINGS_MESSAGE, "query {query}");
            assert!(!advice.ends_conversation(), "query {query}");
        }
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn unknown_query_gets_same_help_for_any_snapshot() {
        let engine = AdvisoryEngine::default();
        let model = CountingModel::new("yes");
        let hot = Reading::new(45.0, 30.0, 5.0, 20.0);
        let mild = Reading::new(28.0, 65.0, 6.5, 50.0);

        let a = engine.respond(Some(&hot), "what's the weather like", &model);
        let b = engine.respond(Some(&mild), "what's the weather like", &model);
        assert_eq!(a.message, HELP_MESSAGE);
        assert_eq!(a, b);
    }

    #[test]
    fn hot_dry_acidic_scenario() {
        let engine = AdvisoryEngine::default();
        let model = CountingModel::new("yes");
        let reading = Reading::new(45.0, 30.0, 5.0, 20.0);
        let ask = |q: &str| engine.respond(Some(&reading), q, &model).message;

        assert!(ask("temperature").contains("too high"));
        assert!(ask("humidity").contains("too low"));
        assert!(ask("ph").contains("too acidic"));
        assert!(ask("moisture").contains("too low"));
        assert!(ask("do I need irrigation").contains("Irrigation Needed: YES"));
        assert_eq!(model.calls.get(), 1);
    }

    #[test]
    fn irrigation_follows_current_model_prediction() {
        let engine = AdvisoryEngine::default();
        let reading = Reading::new(45.0, 30.0, 5.0, 20.0);
        let no = engine.respond(Some(&reading), "irrigation", &CountingModel::new("no"));
        assert!(no.message.contains("Irrigation Needed: NO"));
    }

    #[test]
    fn greeting_and_farewell_after_analysis() {
        let engine = AdvisoryEngine::default();
        let model = CountingModel::new("yes");
        let reading = Reading::new(28.0, 65.0, 6.5, 50.0);
        assert_eq!(
            engine.respond(Some(&reading), "hello", &model).message,
            GREETING_MESSAGE
        );
        let bye = engine.respond(Some(&reading), "bye", &model);
        assert_eq!(bye.message, FAREWELL_MESSAGE);
        assert!(bye.ends_conversation());
    }

    #[test]
    fn preset_changes_boundary_outcome() {
        let model = CountingModel::new("no");
        let reading = Reading::new(36.0, 50.0, 6.5, 50.0);

        let standard = AdvisoryEngine::new(ThresholdTable::standard());
        let strict = AdvisoryEngine::new(ThresholdTable::strict());
        assert!(standard
            .respond(Some(&reading), "temperature", &model)
            .message
            .contains("Normal"));
        assert!(strict
            .respond(Some(&reading), "temperature", &model)
            .message
            .contains("too high"));
        assert!(strict
            .respond(Some(&reading), "humidity", &model)
            .message
            .contains("too low"));
    }

    #[test]
    fn evaluate_all_covers_every_rule() {
        let engine = AdvisoryEngine::default();
        let model = CountingModel::new("no");
        let all = engine.evaluate_all(&Reading::new(28.0, 65.0, 6.5, 50.0), &model);
        assert_eq!(all.len(), engine.list_rules().len());
        assert_eq!(all[0].topic, Topic::Temperature);
    }
}
