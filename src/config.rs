use crate::error::{Result, RiceIntelError};
use crate::logic::{Preset, ThresholdTable, TopicThresholds};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
    pub advisory: AdvisoryConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// CSV with temperature, humidity, ph_level, moisture, irrigation_needed
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/rice_field_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Fraction of each class held out for the accuracy measurement
    pub test_size: f64,
    pub seed: u64,
    pub min_child_weight: f64,
    pub lambda: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.05,
            max_depth: 5,
            test_size: 0.2,
            seed: 42,
            min_child_weight: 1.0,
            lambda: 1.0,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(RiceIntelError::Config("model.n_estimators must be > 0".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(RiceIntelError::Config(format!(
                "model.learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RiceIntelError::Config(format!(
                "model.test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.lambda < 0.0 || self.min_child_weight < 0.0 {
            return Err(RiceIntelError::Config(
                "model.lambda and model.min_child_weight must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Threshold preset plus optional per-topic replacements.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub preset: Preset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TopicThresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<TopicThresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture: Option<TopicThresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<TopicThresholds>,
}

impl AdvisoryConfig {
    /// The preset's table with any configured topics swapped in.
    pub fn thresholds(&self) -> Result<ThresholdTable> {
        let mut table = self.preset.table();
        let overrides = [
            ("temperature", &self.temperature, &mut table.temperature),
            ("humidity", &self.humidity, &mut table.humidity),
            ("moisture", &self.moisture, &mut table.moisture),
            ("ph", &self.ph, &mut table.ph),
        ];

        for (name, configured, slot) in overrides {
            if let Some(t) = configured {
                if t.low > t.high {
                    return Err(RiceIntelError::Config(format!(
                        "advisory.{}: low ({}) is above high ({})",
                        name, t.low, t.high
                    )));
                }
                *slot = t.clone();
            }
        }

        Ok(table)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Defaults to `<data dir>/reports`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load from `config_override` or the standard locations. A missing file
    /// means defaults; an unreadable or invalid one is an error.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(RiceIntelError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            tracing::info!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| RiceIntelError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| RiceIntelError::Config(format!("Failed to parse config: {}", e)))?;

        config.model.validate()?;
        config.advisory.thresholds()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("riceintel").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/riceintel/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RiceIntelError::Config("Cannot determine config directory".into()))?
            .join("riceintel");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up RiceIntel!");
        println!();

        println!("Training Data");
        let dataset_path: String = Input::new()
            .with_prompt("  Dataset CSV path")
            .default("data/rice_field_data.csv".into())
            .interact_text()
            .map_err(|e| RiceIntelError::Config(format!("Input error: {}", e)))?;

        let defaults = ModelConfig::default();
        let n_estimators: usize = Input::new()
            .with_prompt("  Number of trees")
            .default(defaults.n_estimators)
            .interact_text()
            .map_err(|e| RiceIntelError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Advisor");
        let preset_names: Vec<&str> = Preset::ALL.iter().map(|p| p.as_str()).collect();
        let preset_idx = Select::new()
            .with_prompt("  Threshold preset")
            .items(&preset_names)
            .default(0)
            .interact()
            .map_err(|e| RiceIntelError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            dataset: DatasetConfig {
                path: PathBuf::from(dataset_path),
            },
            model: ModelConfig {
                n_estimators,
                ..defaults
            },
            advisory: AdvisoryConfig {
                preset: Preset::ALL[preset_idx],
                ..AdvisoryConfig::default()
            },
            report: ReportConfig::default(),
        };
        config.model.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| RiceIntelError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# RiceIntel Configuration\n# Generated by `riceintel init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("RICEINTEL_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| RiceIntelError::Config("Cannot determine data directory".into()))?
            .join("riceintel");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn report_dir(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        match &self.report.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir(data_dir_override)?.join("reports")),
        }
    }

    pub fn log_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("riceintel.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.model.n_estimators, 200);
        assert_eq!(config.model.learning_rate, 0.05);
        assert_eq!(config.model.max_depth, 5);
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.advisory.preset, Preset::Standard);
        assert_eq!(
            config.dataset.path,
            PathBuf::from("data/rice_field_data.csv")
        );
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let yaml = "\
dataset:
  path: /srv/fields.csv
model:
  n_estimators: 50
advisory:
  preset: strict
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("/srv/fields.csv"));
        assert_eq!(config.model.n_estimators, 50);
        assert_eq!(config.model.test_size, 0.2);
        assert_eq!(config.advisory.thresholds().unwrap(), ThresholdTable::strict());
    }

    #[test]
    fn topic_override_replaces_preset_entry() {
        let yaml = "\
advisory:
  preset: standard
  ph:
    low: 6.0
    high: 7.0
    low_message: 'acid {value}'
    normal_message: 'ok {value}'
    high_message: 'base {value}'
";
        let config = Config::from_yaml(yaml).unwrap();
        let table = config.advisory.thresholds().unwrap();
        assert_eq!(table.ph.low, 6.0);
        assert_eq!(table.ph.message(5.8), "acid 5.8");
        assert_eq!(table.temperature, ThresholdTable::standard().temperature);
    }

    #[test]
    fn inverted_override_rejected() {
        let yaml = "\
advisory:
  moisture:
    low: 80
    high: 20
    low_message: a
    normal_message: b
    high_message: c
";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(RiceIntelError::Config(_))
        ));
    }

    #[test]
    fn invalid_model_rejected() {
        assert!(Config::from_yaml("model:\n  test_size: 1.5\n").is_err());
        assert!(Config::from_yaml("model:\n  n_estimators: 0\n").is_err());
    }

    #[test]
    fn env_substitution() {
        std::env::set_var("RICEINTEL_TEST_DATASET", "/tmp/env-fields.csv");
        let config = Config::from_yaml("dataset:\n  path: ${RICEINTEL_TEST_DATASET}\n").unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("/tmp/env-fields.csv"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "model:\n  seed: 7\n").unwrap();
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.model.seed, 7);
    }

    #[test]
    fn load_missing_override_is_error() {
        let err = Config::load(Some(PathBuf::from("/nonexistent/riceintel.yaml"))).unwrap_err();
        assert!(matches!(err, RiceIntelError::Config(_)));
    }
}
