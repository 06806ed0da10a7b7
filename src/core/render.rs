use crate::core::form::FormState;
use crate::domain::company::CompanyInfo;
use crate::domain::model::{InterventionKind, ServiceReport, Totals, VAT_RATE};
use crate::utils::error::{Result, SheetError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

const PAGE_WIDTH: usize = 78;
const TITLE: &str = "SCHEDA DI ASSISTENZA TECNICA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Text => "scheda.txt",
            Self::Json => "scheda.json",
            Self::Csv => "scheda.csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(SheetError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub content: String,
}

/// Everything produced for one sheet, ready to be written out.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub totals: Totals,
    pub outputs: Vec<RenderedOutput>,
}

/// Two-decimal display form of an amount.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Quantities print without a fraction when they are whole.
fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn render(
    state: &FormState,
    company: &CompanyInfo,
    formats: &[OutputFormat],
) -> Result<RenderedSheet> {
    let mut outputs = Vec::with_capacity(formats.len());
    for &format in formats {
        let content = match format {
            OutputFormat::Text => render_text(state, company),
            OutputFormat::Json => render_json(state)?,
            OutputFormat::Csv => render_csv(state)?,
        };
        tracing::debug!("Rendered {} ({} bytes)", format.file_name(), content.len());
        outputs.push(RenderedOutput { format, content });
    }

    Ok(RenderedSheet {
        totals: *state.totals(),
        outputs,
    })
}

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(PAGE_WIDTH));
    out.push('\n');
}

fn section(out: &mut String, heading: &str, body: &str) {
    let _ = writeln!(out, "{}", heading);
    if body.trim().is_empty() {
        out.push('\n');
    }
    for line in body.lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

pub fn render_text(state: &FormState, company: &CompanyInfo) -> String {
    let report = state.report();
    let totals = state.totals();
    let mut out = String::new();

    let header = company.header_lines();
    let _ = writeln!(
        out,
        "{:<width$}{:>title$}",
        header.first().map(String::as_str).unwrap_or_default(),
        TITLE,
        width = PAGE_WIDTH - TITLE.len(),
        title = TITLE.len()
    );
    for line in header.iter().skip(1) {
        let _ = writeln!(out, "{}", line);
    }
    rule(&mut out, '=');

    let _ = writeln!(
        out,
        "Data: {:<12}  Scheda N°: {}",
        format_date(report.date),
        report.card_no
    );
    let _ = writeln!(out, "CLIENTE: {}", report.customer);
    let _ = writeln!(out, "TIPI:    {}", report.types);
    let _ = writeln!(out, "MARCHE:  {}", report.brands);
    let _ = writeln!(out, "MODELLI: {}", report.models);
    out.push('\n');

    render_interventions(&mut out, report);
    rule(&mut out, '-');

    section(&mut out, "DIFETTO LAMENTATO", &report.fault_reported);
    section(&mut out, "DIFETTO RISCONTRATO", &report.fault_found);
    section(&mut out, "DESCRIZIONE INTERVENTO", &report.intervention_description);
    rule(&mut out, '-');

    let labor = &report.labor;
    let _ = writeln!(out, "COSTI INTERVENTO");
    let _ = writeln!(
        out,
        "  Tempo Totale Ore: {:<6} Costo Orario €: {}",
        format_quantity(labor.total_hours),
        format_amount(labor.hourly_cost)
    );
    let _ = writeln!(
        out,
        "  Kilometri percorsi: {:<4} Costo Km €: {}",
        format_quantity(labor.km_travelled),
        format_amount(labor.km_cost)
    );
    out.push('\n');

    let _ = writeln!(out, "PARTI SOSTITUITE");
    let _ = writeln!(
        out,
        "  {:<40} {:>6} {:>12} {:>12}",
        "Descrizione", "Q.tà", "Prezzo €", "Totale €"
    );
    for part in &report.parts {
        let _ = writeln!(
            out,
            "  {:<40} {:>6} {:>12} {:>12}",
            truncate(&part.description, 40),
            format_quantity(part.quantity),
            format_amount(part.unit_price),
            format_amount(part.line_total())
        );
    }
    rule(&mut out, '-');

    let _ = writeln!(out, "TOTALI DOCUMENTO");
    for (label, value) in [
        ("Totale imponibile €", totals.taxable_total),
        ("IVA €", totals.tax),
        ("Tot. Documento €", totals.grand_total),
    ] {
        let _ = writeln!(out, "  {:<24}{:>14}", label, format_amount(value));
    }
    rule(&mut out, '=');

    let signatures = &report.signatures;
    let _ = writeln!(
        out,
        "{:<26}{:<26}{}",
        "RESP. INTERVENTO", "DATA", "FIRMA PER CONVALIDA"
    );
    let _ = writeln!(
        out,
        "{:<26}{:<26}{}",
        signatures.responsible,
        format_date(signatures.signature_date),
        signatures.customer_signature
    );

    out
}

fn render_interventions(out: &mut String, report: &ServiceReport) {
    let _ = writeln!(out, "INTERVENTO EFFETTUATO:");
    for pair in InterventionKind::ALL.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|kind| {
                let mark = if report.is_checked(*kind) { 'x' } else { ' ' };
                format!("[{}] {:<30}", mark, kind.label())
            })
            .collect();
        let _ = writeln!(out, "  {}", cells.join(" ").trim_end());
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars - 1).collect();
        cut.push('…');
        cut
    }
}

#[derive(Serialize)]
struct DisplayTotals {
    taxable_total: String,
    tax: String,
    grand_total: String,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: DateTime<Utc>,
    vat_rate: f64,
    report: &'a ServiceReport,
    totals: DisplayTotals,
    raw_totals: &'a Totals,
}

pub fn render_json(state: &FormState) -> Result<String> {
    let totals = state.totals();
    let export = JsonExport {
        generated_at: Utc::now(),
        vat_rate: VAT_RATE,
        report: state.report(),
        totals: DisplayTotals {
            taxable_total: format_amount(totals.taxable_total),
            tax: format_amount(totals.tax),
            grand_total: format_amount(totals.grand_total),
        },
        raw_totals: totals,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn render_csv(state: &FormState) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["row", "description", "quantity", "unit_price", "line_total"])?;

    for (index, part) in state.report().parts.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            part.description.clone(),
            format_quantity(part.quantity),
            format_amount(part.unit_price),
            format_amount(part.line_total()),
        ])?;
    }

    let totals = state.totals();
    for (label, value) in [
        ("taxable_total", totals.taxable_total),
        ("tax", totals.tax),
        ("grand_total", totals.grand_total),
    ] {
        writer.write_record(["", label, "", "", format_amount(value).as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SheetError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        SheetError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
