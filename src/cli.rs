use crate::error::{Result, RiceIntelError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "riceintel",
    version,
    about = "Rice field condition analyzer with irrigation model and advisor chatbot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override data directory (logs, reports)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the training dataset path
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config, load the dataset and report model accuracy
    Check,
    /// Classify one set of readings
    Predict {
        #[command(flatten)]
        reading: ReadingArgs,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the advisor one question
    Ask {
        /// Free-text question, e.g. "how is the soil moisture?"
        query: String,

        #[command(flatten)]
        reading: OptionalReadingArgs,
    },
    /// Write a field report for one set of readings
    Report {
        #[command(flatten)]
        reading: ReadingArgs,

        /// Output directory (defaults to config or data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the advisory threshold presets
    Presets,
}

/// Raw strings so malformed numbers are reported the same way as form input.
#[derive(Args, Debug, Clone)]
pub struct ReadingArgs {
    /// Air temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: String,
    /// Relative humidity in %
    #[arg(long, allow_hyphen_values = true)]
    pub humidity: String,
    /// Soil pH
    #[arg(long, allow_hyphen_values = true)]
    pub ph: String,
    /// Soil moisture in %
    #[arg(long, allow_hyphen_values = true)]
    pub moisture: String,
}

/// All four or none: without readings the advisor answers as if nothing
/// has been analyzed yet.
#[derive(Args, Debug, Clone)]
pub struct OptionalReadingArgs {
    /// Air temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<String>,
    /// Relative humidity in %
    #[arg(long, allow_hyphen_values = true)]
    pub humidity: Option<String>,
    /// Soil pH
    #[arg(long, allow_hyphen_values = true)]
    pub ph: Option<String>,
    /// Soil moisture in %
    #[arg(long, allow_hyphen_values = true)]
    pub moisture: Option<String>,
}

impl OptionalReadingArgs {
    pub fn into_required(self) -> Result<Option<ReadingArgs>> {
        match (self.temperature, self.humidity, self.ph, self.moisture) {
            (None, None, None, None) => Ok(None),
            (Some(temperature), Some(humidity), Some(ph), Some(moisture)) => {
                Ok(Some(ReadingArgs {
                    temperature,
                    humidity,
                    ph,
                    moisture,
                }))
            }
            _ => Err(RiceIntelError::InvalidInput(
                "give all four readings (--temperature, --humidity, --ph, --moisture) or none"
                    .into(),
            )),
        }
    }
}
