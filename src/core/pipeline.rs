use crate::core::form::{FieldEdit, FormState};
use crate::core::render::{self, OutputFormat, RenderedSheet};
use crate::domain::model::{LineItem, ServiceReport};
use crate::domain::ports::{ConfigProvider, SheetPipeline, Storage};
use crate::utils::error::{Result, SheetError};
use std::path::Path;

/// Loads one report, applies the queued edits, renders and writes it.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    input: Option<String>,
    edits: Vec<FieldEdit>,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
            input: None,
            edits: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_edits(mut self, edits: Vec<FieldEdit>) -> Self {
        self.edits = edits;
        self
    }

    async fn load_report(&self, input: &str) -> Result<ServiceReport> {
        let bytes = self.source.read_file(input).await?;
        let text = String::from_utf8(bytes).map_err(|e| {
            SheetError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let extension = Path::new(input)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let report = match extension.as_deref() {
            Some("json") => serde_json::from_str(&text)?,
            Some("toml") => toml::from_str(&text)?,
            other => {
                return Err(SheetError::UnsupportedFormat {
                    format: other.unwrap_or("<none>").to_string(),
                })
            }
        };
        self.fit_part_rows(report)
    }

    /// Pads the part list up to the configured row count.
    fn fit_part_rows(&self, mut report: ServiceReport) -> Result<ServiceReport> {
        let rows = self.config.part_rows();
        if report.parts.len() > rows {
            return Err(SheetError::invalid_field(
                "parts",
                format!(
                    "report has {} part rows but the sheet holds {}",
                    report.parts.len(),
                    rows
                ),
            ));
        }
        report.parts.resize_with(rows, LineItem::default);
        Ok(report)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> SheetPipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<FormState> {
        let state = match &self.input {
            Some(input) => {
                tracing::debug!("Reading report from: {}", input);
                FormState::new(self.load_report(input).await?)
            }
            None => {
                tracing::info!("No input report, starting from a blank sheet");
                FormState::blank(self.config.part_rows())
            }
        };

        state.apply_all(&self.edits)
    }

    async fn transform(&self, state: FormState) -> Result<RenderedSheet> {
        let formats = self
            .config
            .output_formats()
            .iter()
            .map(|f| f.parse::<OutputFormat>())
            .collect::<Result<Vec<_>>>()?;

        render::render(&state, self.config.company(), &formats)
    }

    async fn load(&self, sheet: RenderedSheet) -> Result<String> {
        let mut written = Vec::with_capacity(sheet.outputs.len());
        for output in &sheet.outputs {
            let file_name = output.format.file_name();
            self.sink
                .write_file(file_name, output.content.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", file_name);
            written.push(file_name);
        }

        let primary = written.first().copied().unwrap_or_default();
        Ok(Path::new(self.config.output_path())
            .join(primary)
            .to_string_lossy()
            .into_owned())
    }
}
