use super::boosting::{BoostingParams, GradientBoostingClassifier};
use super::encoder::LabelEncoder;
use super::metrics::accuracy;
use super::scaler::StandardScaler;
use super::split::stratified_split;
use super::tree::TreeParams;
use super::FeatureRow;
use crate::config::ModelConfig;
use crate::error::{Result, RiceIntelError};
use crate::models::{Dataset, Reading, Verdict};

/// Anything that can turn a reading into an irrigation verdict.
pub trait VerdictSource {
    fn verdict(&self, reading: &Reading) -> Verdict;
}

/// Trained scaler, label encoding and boosted ensemble, plus the accuracy
/// measured on the held-out partition.
#[derive(Debug, Clone)]
pub struct IrrigationClassifier {
    encoder: LabelEncoder,
    scaler: StandardScaler,
    model: GradientBoostingClassifier,
    accuracy: f64,
    train_rows: usize,
    test_rows: usize,
}

impl IrrigationClassifier {
    pub fn train(dataset: &Dataset, config: &ModelConfig) -> Result<Self> {
        if dataset.is_empty() {
            return Err(RiceIntelError::Data("Dataset has no rows".into()));
        }

        let encoder = LabelEncoder::fit(
            dataset
                .records()
                .iter()
                .map(|r| r.irrigation_needed.as_str()),
        );
        if encoder.n_classes() < 2 {
            return Err(RiceIntelError::Data(format!(
                "Need at least two irrigation_needed classes, found {:?}",
                encoder.classes()
            )));
        }

        let features: Vec<FeatureRow> = dataset
            .records()
            .iter()
            .map(|r| r.reading.features())
            .collect();
        let labels: Vec<usize> = dataset
            .records()
            .iter()
            .map(|r| {
                encoder
                    .transform(&r.irrigation_needed)
                    .ok_or_else(|| RiceIntelError::Model("Label missing from encoder".into()))
            })
            .collect::<Result<_>>()?;

        for (label, count) in dataset.class_counts() {
            if count < 2 {
                return Err(RiceIntelError::Data(format!(
                    "Class '{}' has {} row(s); stratified split needs at least 2",
                    label, count
                )));
            }
        }

        let split = stratified_split(&labels, encoder.n_classes(), config.test_size, config.seed)?;

        let pick = |idx: &[usize]| -> (Vec<FeatureRow>, Vec<usize>) {
            idx.iter().map(|&i| (features[i], labels[i])).unzip()
        };
        let (x_train, y_train) = pick(&split.train);
        let (x_test, y_test) = pick(&split.test);

        let scaler = StandardScaler::fit(&x_train);
        tracing::debug!(
            "Scaler mean {:?}, scale {:?}",
            scaler.mean(),
            scaler.scale()
        );
        let x_train = scaler.transform_all(&x_train);
        let x_test = scaler.transform_all(&x_test);

        let params = BoostingParams {
            n_estimators: config.n_estimators,
            learning_rate: config.learning_rate,
            tree: TreeParams {
                max_depth: config.max_depth,
                min_child_weight: config.min_child_weight,
                lambda: config.lambda,
            },
        };
        let model = GradientBoostingClassifier::fit(&x_train, &y_train, encoder.n_classes(), &params)?;

        let predicted: Vec<usize> = x_test.iter().map(|x| model.predict(x)).collect();
        let accuracy = accuracy(&y_test, &predicted);

        tracing::info!(
            "Trained {} rounds (lr {}, depth {}) on {} rows; held-out accuracy {:.2}% over {} rows",
            model.n_rounds(),
            config.learning_rate,
            config.max_depth,
            x_train.len(),
            accuracy * 100.0,
            x_test.len()
        );

        Ok(Self {
            encoder,
            scaler,
            model,
            accuracy,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }

    /// Classify one reading. Values outside the training range are
    /// extrapolated without any guard.
    pub fn predict(&self, reading: &Reading) -> Verdict {
        let scaled = self.scaler.transform(&reading.features());
        let index = self.model.predict(&scaled);
        let label = self.encoder.inverse(index).unwrap_or_default();
        Verdict::new(label, self.accuracy)
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn labels(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    pub fn test_rows(&self) -> usize {
        self.test_rows
    }
}

impl VerdictSource for IrrigationClassifier {
    fn verdict(&self, reading: &Reading) -> Verdict {
        self.predict(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingRecord;

    /// Irrigation is needed when the field is dry or hot.
    fn synthetic(n: usize) -> Dataset {
        let records = (0..n)
            .map(|i| {
                let temperature = 18.0 + (i * 7 % 25) as f64;
                let humidity = 35.0 + (i * 11 % 55) as f64;
                let ph = 5.0 + (i * 3 % 30) as f64 / 10.0;
                let moisture = 15.0 + (i * 13 % 70) as f64;
                let label = if moisture < 40.0 || temperature > 36.0 {
                    "yes"
                } else {
                    "no"
                };
                TrainingRecord::new(Reading::new(temperature, humidity, ph, moisture), label)
            })
            .collect();
        Dataset::from_records(records)
    }

    fn fast_config() -> ModelConfig {
        ModelConfig {
            n_estimators: 40,
            learning_rate: 0.3,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn learns_synthetic_rule() {
        let clf = IrrigationClassifier::train(&synthetic(200), &fast_config()).unwrap();
        assert!(clf.accuracy() >= 0.85, "accuracy {}", clf.accuracy());
        assert_eq!(clf.labels(), ["no", "yes"]);
        assert_eq!(clf.train_rows() + clf.test_rows(), 200);

        assert_eq!(clf.predict(&Reading::new(25.0, 60.0, 6.5, 15.0)).label, "yes");
        assert_eq!(clf.predict(&Reading::new(25.0, 60.0, 6.5, 70.0)).label, "no");
    }

    #[test]
    fn predict_is_deterministic() {
        let clf = IrrigationClassifier::train(&synthetic(120), &fast_config()).unwrap();
        let reading = Reading::new(33.3, 61.0, 6.1, 41.0);
        let first = clf.predict(&reading);
        for _ in 0..10 {
            assert_eq!(clf.predict(&reading), first);
        }
        assert_eq!(first.accuracy, clf.accuracy());
    }

    #[test]
    fn retraining_reproduces_accuracy() {
        let data = synthetic(150);
        let a = IrrigationClassifier::train(&data, &fast_config()).unwrap();
        let b = IrrigationClassifier::train(&data, &fast_config()).unwrap();
        assert_eq!(a.accuracy(), b.accuracy());
    }

    #[test]
    fn out_of_distribution_reading_still_classified() {
        let clf = IrrigationClassifier::train(&synthetic(120), &fast_config()).unwrap();
        let v = clf.predict(&Reading::new(1e4, -50.0, 14.0, 1e3));
        assert!(clf.labels().contains(&v.label));
    }

    #[test]
    fn single_class_is_data_error() {
        let records = (0..10)
            .map(|i| TrainingRecord::new(Reading::new(i as f64, 50.0, 6.0, 40.0), "yes"))
            .collect();
        let err = IrrigationClassifier::train(&Dataset::from_records(records), &fast_config())
            .unwrap_err();
        assert!(matches!(err, RiceIntelError::Data(_)));
    }

    #[test]
    fn unstratifiable_class_is_named() {
        let mut records: Vec<TrainingRecord> = (0..10)
            .map(|i| TrainingRecord::new(Reading::new(i as f64, 50.0, 6.0, 40.0), "no"))
            .collect();
        records.push(TrainingRecord::new(Reading::new(40.0, 30.0, 6.0, 10.0), "yes"));

        match IrrigationClassifier::train(&Dataset::from_records(records), &fast_config()) {
            Err(RiceIntelError::Data(msg)) => assert!(msg.contains("'yes'"), "{msg}"),
            other => panic!("expected data error, got {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_is_data_error() {
        let err = IrrigationClassifier::train(&Dataset::default(), &fast_config()).unwrap_err();
        assert!(matches!(err, RiceIntelError::Data(_)));
    }

    #[test]
    fn bundled_dataset_trains_reproducibly() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/rice_field_data.csv");
        let data = Dataset::from_csv_path(&path).unwrap();
        let config = ModelConfig::default();

        let a = IrrigationClassifier::train(&data, &config).unwrap();
        let b = IrrigationClassifier::train(&data, &config).unwrap();
        assert_eq!(a.accuracy(), b.accuracy());
        assert!(a.accuracy() > 0.75, "accuracy {}", a.accuracy());
        assert_eq!(a.test_rows(), 120);
    }
}
