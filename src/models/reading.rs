use crate::error::{Result, RiceIntelError};
use serde::{Deserialize, Serialize};

/// The four sensor features, in the order the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    Temperature,
    Humidity,
    Ph,
    Moisture,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Moisture,
    ];

    /// Column name in the training dataset.
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::Ph => "ph_level",
            Feature::Moisture => "moisture",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Temperature => "Temperature (°C)",
            Feature::Humidity => "Humidity (%)",
            Feature::Ph => "pH Level",
            Feature::Moisture => "Moisture (%)",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Feature::Temperature => "°C",
            Feature::Humidity | Feature::Moisture => "%",
            Feature::Ph => "",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Feature::Temperature => Feature::Humidity,
            Feature::Humidity => Feature::Ph,
            Feature::Ph => Feature::Moisture,
            Feature::Moisture => Feature::Temperature,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Feature::Temperature => Feature::Moisture,
            Feature::Humidity => Feature::Temperature,
            Feature::Ph => Feature::Humidity,
            Feature::Moisture => Feature::Ph,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Feature::Temperature => 0,
            Feature::Humidity => 1,
            Feature::Ph => 2,
            Feature::Moisture => 3,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One sample of the four field sensors.
///
/// No physical range is enforced: a 60°C temperature or a negative moisture
/// value is carried through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub moisture: f64,
}

impl Reading {
    pub fn new(temperature: f64, humidity: f64, ph: f64, moisture: f64) -> Self {
        Self {
            temperature,
            humidity,
            ph,
            moisture,
        }
    }

    /// Parse the raw form fields. Fails without side effects on the first
    /// field that is not a finite number.
    pub fn parse(temperature: &str, humidity: &str, ph: &str, moisture: &str) -> Result<Self> {
        Ok(Self {
            temperature: parse_field(Feature::Temperature, temperature)?,
            humidity: parse_field(Feature::Humidity, humidity)?,
            ph: parse_field(Feature::Ph, ph)?,
            moisture: parse_field(Feature::Moisture, moisture)?,
        })
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::Ph => self.ph,
            Feature::Moisture => self.moisture,
        }
    }

    /// Feature vector in training order: temperature, humidity, pH, moisture.
    pub fn features(&self) -> [f64; 4] {
        [self.temperature, self.humidity, self.ph, self.moisture]
    }
}

fn parse_field(feature: Feature, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        RiceIntelError::InvalidInput(format!(
            "{} must be a number, got '{}'",
            feature.label(),
            raw.trim()
        ))
    })?;

    if !value.is_finite() {
        return Err(RiceIntelError::InvalidInput(format!(
            "{} must be a finite number",
            feature.label()
        )));
    }

    Ok(value)
}

/// Trim trailing zeros so `35.0` prints as `35` and `6.25` stays `6.25`.
pub fn format_value(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_fields() {
        let r = Reading::parse("31.5", " 72 ", "6.4", "45").unwrap();
        assert_eq!(r, Reading::new(31.5, 72.0, 6.4, 45.0));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = Reading::parse("31.5", "wet", "6.4", "45").unwrap_err();
        match err {
            RiceIntelError::InvalidInput(msg) => assert!(msg.contains("Humidity")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_and_non_finite() {
        assert!(Reading::parse("", "70", "6.4", "45").is_err());
        assert!(Reading::parse("30", "70", "NaN", "45").is_err());
        assert!(Reading::parse("30", "70", "6.4", "inf").is_err());
    }

    #[test]
    fn out_of_range_values_are_accepted() {
        let r = Reading::parse("-40", "250", "15", "-3").unwrap();
        assert_eq!(r.features(), [-40.0, 250.0, 15.0, -3.0]);
    }

    #[test]
    fn feature_order_matches_training_columns() {
        let r = Reading::new(1.0, 2.0, 3.0, 4.0);
        for feature in Feature::ALL {
            assert_eq!(r.features()[feature.index()], r.get(feature));
        }
        let columns: Vec<_> = Feature::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(columns, ["temperature", "humidity", "ph_level", "moisture"]);
    }

    #[test]
    fn feature_cycle() {
        let mut f = Feature::Temperature;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, Feature::Temperature);
        assert_eq!(Feature::Temperature.prev(), Feature::Moisture);
    }

    #[test]
    fn format_value_trims_zeros() {
        assert_eq!(format_value(35.0), "35");
        assert_eq!(format_value(6.25), "6.25");
        assert_eq!(format_value(5.5), "5.5");
        assert_eq!(format_value(-0.001), "0");
    }
}
