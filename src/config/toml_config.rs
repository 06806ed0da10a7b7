use crate::core::render::OutputFormat;
use crate::domain::company::CompanyInfo;
use crate::domain::model::DEFAULT_PART_ROWS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SheetError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

/// Upper bound on part rows; more than this does not fit one printed page.
pub const MAX_PART_ROWS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub sheet: SheetConfig,
    pub company: CompanyInfo,
    pub load: LoadConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            sheet: SheetConfig::default(),
            company: CompanyInfo::pluriservice(),
            load: LoadConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub part_rows: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            part_rows: DEFAULT_PART_ROWS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: Option<String>,
    pub output_formats: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: Some("./output".to_string()),
            output_formats: vec!["text".to_string()],
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SheetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("company.name", &self.company.name)?;

        if let Some(website) = &self.company.website {
            validation::validate_url("company.website", website)?;
        }

        validation::validate_range("sheet.part_rows", self.sheet.part_rows, 1, MAX_PART_ROWS)?;

        let output_path =
            validation::validate_required_field("load.output_path", &self.load.output_path)?;
        validation::validate_path("load.output_path", output_path)?;

        if self.load.output_formats.is_empty() {
            return Err(SheetError::ConfigValidationError {
                field: "load.output_formats".to_string(),
                message: "at least one output format is required".to_string(),
            });
        }
        for format in &self.load.output_formats {
            format.parse::<OutputFormat>()?;
        }

        Ok(())
    }

    pub fn parsed_formats(&self) -> Result<Vec<OutputFormat>> {
        self.load
            .output_formats
            .iter()
            .map(|f| f.parse())
            .collect()
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        self.load.output_path.as_deref().unwrap_or("./output")
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn part_rows(&self) -> usize {
        self.sheet.part_rows
    }

    fn company(&self) -> &CompanyInfo {
        &self.company
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
