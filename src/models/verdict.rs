use serde::{Deserialize, Serialize};

/// Classifier output for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Label from the training set, e.g. `yes` / `no`.
    pub label: String,
    /// Held-out accuracy measured at training time, in `[0, 1]`.
    pub accuracy: f64,
}

impl Verdict {
    pub fn new(label: impl Into<String>, accuracy: f64) -> Self {
        Self {
            label: label.into(),
            accuracy,
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// Whether the label reads as "irrigation needed".
    pub fn is_positive(&self) -> bool {
        matches!(
            self.label.to_lowercase().as_str(),
            "yes" | "true" | "1" | "needed"
        )
    }

    pub fn headline(&self) -> String {
        format!("Irrigation Needed: {}", self.label.to_uppercase())
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (model accuracy {:.2}%)",
            self.headline(),
            self.accuracy_percent()
        )
    }
}
