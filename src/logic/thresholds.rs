use crate::models::{format_value, Feature, Severity};
use serde::{Deserialize, Serialize};

/// Where a value falls relative to a topic's cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Normal,
    High,
}

impl Level {
    pub fn severity(&self) -> Severity {
        match self {
            Level::Normal => Severity::Info,
            Level::Low | Level::High => Severity::Warning,
        }
    }
}

/// Cutoffs and message templates for one sensor topic.
///
/// Both comparisons are strict: a value equal to `low` or `high` is normal.
/// Messages may contain `{value}`, replaced with the reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicThresholds {
    pub low: f64,
    pub high: f64,
    pub low_message: String,
    pub normal_message: String,
    pub high_message: String,
}

impl TopicThresholds {
    fn new(low: f64, high: f64, low_msg: &str, normal_msg: &str, high_msg: &str) -> Self {
        Self {
            low,
            high,
            low_message: low_msg.to_string(),
            normal_message: normal_msg.to_string(),
            high_message: high_msg.to_string(),
        }
    }

    pub fn classify(&self, value: f64) -> Level {
        if value < self.low {
            Level::Low
        } else if value > self.high {
            Level::High
        } else {
            Level::Normal
        }
    }

    pub fn is_low(&self, value: f64) -> bool {
        self.classify(value) == Level::Low
    }

    pub fn is_high(&self, value: f64) -> bool {
        self.classify(value) == Level::High
    }

    pub fn message(&self, value: f64) -> String {
        let template = match self.classify(value) {
            Level::Low => &self.low_message,
            Level::Normal => &self.normal_message,
            Level::High => &self.high_message,
        };
        template.replace("{value}", &format_value(value))
    }
}

/// Named threshold sets. The two disagree on several cutoffs; `Standard` is
/// the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Standard,
    Strict,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Standard, Preset::Strict];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::Strict => "strict",
        }
    }

    pub fn table(&self) -> ThresholdTable {
        match self {
            Preset::Standard => ThresholdTable::standard(),
            Preset::Strict => ThresholdTable::strict(),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub temperature: TopicThresholds,
    pub humidity: TopicThresholds,
    pub moisture: TopicThresholds,
    pub ph: TopicThresholds,
}

impl ThresholdTable {
    /// Temperature 20–38°C, humidity 40–80%, moisture 30–70%, pH 5.5–7.5.
    pub fn standard() -> Self {
        Self {
            temperature: TopicThresholds::new(
                20.0,
                38.0,
                "Temperature is {value}°C - too low. Protect your field from cold.",
                "Temperature is {value}°C - Normal range for rice.",
                "Temperature is {value}°C - too high! Apply irrigation & consider shading.",
            ),
            humidity: TopicThresholds::new(
                40.0,
                80.0,
                "Humidity {value}% - too low. Use irrigation & mulching.",
                "Humidity {value}% - Suitable for rice.",
                "Humidity {value}% - too high. Watch for fungal infections.",
            ),
            moisture: TopicThresholds::new(
                30.0,
                70.0,
                "Moisture {value}% - too low. Immediate irrigation needed.",
                "Moisture {value}% - Balanced for rice growth.",
                "Moisture {value}% - too high. Avoid overwatering.",
            ),
            ph: TopicThresholds::new(
                5.5,
                7.5,
                "pH {value} - too acidic. Apply lime to balance it.",
                "pH {value} - Ideal for rice farming.",
                "pH {value} - too alkaline. Add compost or sulfur to lower it.",
            ),
        }
    }

    /// Temperature 20–35°C, humidity 60–80%, moisture 40–60%, pH 5.5–7.0.
    pub fn strict() -> Self {
        Self {
            temperature: TopicThresholds::new(
                20.0,
                35.0,
                "Temperature is {value}°C - too low. Protect the field from cold stress.",
                "Temperature is {value}°C - Normal range for rice.",
                "Temperature is {value}°C - too high! Shade the nursery and irrigate in the evening.",
            ),
            humidity: TopicThresholds::new(
                60.0,
                80.0,
                "Humidity {value}% - too low. Irrigate and mulch to hold moisture.",
                "Humidity {value}% - Suitable for rice.",
                "Humidity {value}% - too high. Fungal risk; improve ventilation between rows.",
            ),
            moisture: TopicThresholds::new(
                40.0,
                60.0,
                "Moisture {value}% - too low. Irrigate immediately.",
                "Moisture {value}% - Balanced for rice growth.",
                "Moisture {value}% - too high. Reduce watering and open drainage channels.",
            ),
            ph: TopicThresholds::new(
                5.5,
                7.0,
                "pH {value} - too acidic. Apply agricultural lime.",
                "pH {value} - Ideal for rice farming.",
                "pH {value} - too alkaline. Work in sulfur or compost.",
            ),
        }
    }

    pub fn for_feature(&self, feature: Feature) -> &TopicThresholds {
        match feature {
            Feature::Temperature => &self.temperature,
            Feature::Humidity => &self.humidity,
            Feature::Ph => &self.ph,
            Feature::Moisture => &self.moisture,
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoffs_are_strict() {
        let t = ThresholdTable::standard();
        assert_eq!(t.temperature.classify(19.99), Level::Low);
        assert_eq!(t.temperature.classify(20.0), Level::Normal);
        assert_eq!(t.temperature.classify(38.0), Level::Normal);
        assert_eq!(t.temperature.classify(38.01), Level::High);
    }

    #[test]
    fn strict_preset_boundaries() {
        let t = ThresholdTable::strict();
        assert_eq!(t.temperature.classify(35.0), Level::Normal);
        assert_eq!(t.temperature.classify(36.0), Level::High);
        assert_eq!(t.humidity.classify(50.0), Level::Low);
        assert_eq!(ThresholdTable::standard().humidity.classify(50.0), Level::Normal);
        assert_eq!(t.ph.classify(7.2), Level::High);
    }

    #[test]
    fn message_substitutes_value() {
        let t = ThresholdTable::standard();
        assert_eq!(
            t.ph.message(5.0),
            "pH 5 - too acidic. Apply lime to balance it."
        );
        assert_eq!(
            t.moisture.message(45.5),
            "Moisture 45.5% - Balanced for rice growth."
        );
    }

    #[test]
    fn level_severity() {
        assert_eq!(Level::Low.severity(), Severity::Warning);
        assert_eq!(Level::Normal.severity(), Severity::Info);
    }

    #[test]
    fn preset_parsing() {
        let strict: Preset = serde_yaml::from_str("strict").unwrap();
        assert_eq!(strict, Preset::Strict);
        assert!(serde_yaml::from_str::<Preset>("loose").is_err());
        assert_eq!(Preset::default().table(), ThresholdTable::standard());
    }

    #[test]
    fn table_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&ThresholdTable::strict()).unwrap();
        let back: ThresholdTable = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, ThresholdTable::strict());
    }
}
