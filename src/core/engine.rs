use crate::core::form::FormState;
use crate::core::render::format_amount;
use crate::domain::model::Totals;
use crate::domain::ports::SheetPipeline;
use crate::utils::error::Result;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub totals: Totals,
    pub files_written: usize,
}

pub struct SheetEngine<P: SheetPipeline> {
    pipeline: P,
}

impl<P: SheetPipeline> SheetEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting service sheet run");

        let state = self.pipeline.extract().await?;
        log_totals(state.totals());

        let rendered = self.pipeline.transform(state).await?;
        let totals = rendered.totals;
        let files_written = rendered.outputs.len();
        tracing::info!("Rendered {} output(s)", files_written);

        let output_path = self.pipeline.load(rendered).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            totals,
            files_written,
        })
    }

    /// Runs only the extract step, for dry runs.
    pub async fn preview(&self) -> Result<FormState> {
        let state = self.pipeline.extract().await?;
        log_totals(state.totals());
        Ok(state)
    }
}

fn log_totals(totals: &Totals) {
    tracing::info!(
        "Totale imponibile € {} | IVA € {} | Tot. Documento € {}",
        format_amount(totals.taxable_total),
        format_amount(totals.tax),
        format_amount(totals.grand_total)
    );
}
