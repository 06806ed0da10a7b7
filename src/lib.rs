pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::{RunSummary, SheetEngine},
    form::{FieldEdit, FormState},
    pipeline::ReportPipeline,
    render::{format_amount, OutputFormat},
    totals::compute_totals,
};
pub use domain::model::{InterventionKind, LaborInputs, LineItem, ServiceReport, Totals, VAT_RATE};
pub use utils::error::{Result, SheetError};
