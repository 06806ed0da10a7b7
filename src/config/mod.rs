pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::form::FieldEdit;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use self::toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "service-sheet")]
#[command(about = "Fill in a technical-service sheet and compute its totals")]
pub struct CliConfig {
    /// Path to a TOML configuration file (company header, output settings)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report to load (.toml or .json); a blank sheet is used when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    /// Field edits applied in order, e.g. --set parts.0.quantity=2
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub edits: Vec<String>,

    /// Overrides load.output_path from the configuration
    #[arg(long)]
    pub output_path: Option<String>,

    /// Overrides load.output_formats (text, json, csv)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Print the totals without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.load.output_path = Some(output_path.clone());
        }
        if !self.format.is_empty() {
            config.load.output_formats = self.format.clone();
        }

        Ok(config)
    }

    pub fn parsed_edits(&self) -> Result<Vec<FieldEdit>> {
        self.edits.iter().map(|e| e.parse()).collect()
    }
}
