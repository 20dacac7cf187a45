use serde::{Deserialize, Serialize};

/// Maps string labels to dense indices. Classes are kept in sorted order so the
/// same label set always yields the same encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = labels.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn inverse(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_sorted_and_unique() {
        let enc = LabelEncoder::fit(["yes", "no", "yes", "maybe"]);
        assert_eq!(enc.classes(), ["maybe", "no", "yes"]);
        assert_eq!(enc.transform("no"), Some(1));
        assert_eq!(enc.transform("never"), None);
        assert_eq!(enc.inverse(2), Some("yes"));
        assert_eq!(enc.inverse(3), None);
        assert_eq!(enc.n_classes(), 3);
    }
}
