use super::reading::{Feature, Reading};
use crate::error::{Result, RiceIntelError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

pub const LABEL_COLUMN: &str = "irrigation_needed";

/// One historical reading with its observed irrigation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub reading: Reading,
    pub irrigation_needed: String,
}

impl TrainingRecord {
    pub fn new(reading: Reading, label: impl Into<String>) -> Self {
        Self {
            reading,
            irrigation_needed: label.into(),
        }
    }
}

/// Immutable table of training records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TrainingRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<TrainingRecord>) -> Self {
        Self { records }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RiceIntelError::Data(format!(
                "Dataset not found at {}",
                path.display()
            )));
        }
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_csv_reader(file)?;
        tracing::info!(
            "Loaded {} training records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a CSV table. Columns are located by header name, so order is free
    /// and extra columns are ignored.
    pub fn from_csv_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    RiceIntelError::Data(format!("Missing required column '{}'", name))
                })
        };

        let mut feature_cols = [0usize; 4];
        for feature in Feature::ALL {
            feature_cols[feature.index()] = find(feature.column())?;
        }
        let label_col = find(LABEL_COLUMN)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = row + 2;

            let mut values = [0.0f64; 4];
            for feature in Feature::ALL {
                let raw = record.get(feature_cols[feature.index()]).unwrap_or("");
                values[feature.index()] = raw.parse().map_err(|_| {
                    RiceIntelError::Data(format!(
                        "Line {}: column '{}' is not a number: '{}'",
                        line,
                        feature.column(),
                        raw
                    ))
                })?;
            }

            let label = record.get(label_col).unwrap_or("");
            if label.is_empty() {
                return Err(RiceIntelError::Data(format!(
                    "Line {}: empty '{}' label",
                    line, LABEL_COLUMN
                )));
            }

            records.push(TrainingRecord::new(
                Reading::new(values[0], values[1], values[2], values[3]),
                label,
            ));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row count per label, sorted by label.
    pub fn class_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.records {
            *counts.entry(r.irrigation_needed.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
