//! Form state transitions.
//!
//! A [`FormState`] is never patched in place: every edit yields a fresh
//! state whose totals were recomputed from its own report.

use crate::core::totals::compute_totals;
use crate::domain::coercion::coerce_number;
use crate::domain::model::{parse_date_control, InterventionKind, ServiceReport, Totals};
use crate::utils::error::{Result, SheetError};
use std::fmt;
use std::str::FromStr;

/// A service report together with the totals derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    report: ServiceReport,
    totals: Totals,
}

impl FormState {
    pub fn new(report: ServiceReport) -> Self {
        let totals = compute_totals(&report.parts, &report.labor);
        Self { report, totals }
    }

    pub fn blank(part_rows: usize) -> Self {
        Self::new(ServiceReport::blank(part_rows))
    }

    pub fn report(&self) -> &ServiceReport {
        &self.report
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Applies one edit and returns the resulting state.
    pub fn apply(&self, edit: &FieldEdit) -> Result<FormState> {
        let mut report = self.report.clone();
        edit.write_into(&mut report)?;
        tracing::debug!("Applied edit {}", edit);
        Ok(FormState::new(report))
    }

    /// Applies edits in order, stopping at the first rejected one.
    pub fn apply_all<'a, I>(&self, edits: I) -> Result<FormState>
    where
        I: IntoIterator<Item = &'a FieldEdit>,
    {
        edits
            .into_iter()
            .try_fold(self.clone(), |state, edit| state.apply(edit))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(ServiceReport::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartField {
    Description,
    Quantity,
    UnitPrice,
}

/// Addressable form controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Date,
    CardNo,
    Customer,
    Types,
    Brands,
    Models,
    FaultReported,
    FaultFound,
    InterventionDescription,
    TotalHours,
    KmTravelled,
    HourlyCost,
    KmCost,
    Part(usize, PartField),
    Responsible,
    SignatureDate,
    CustomerSignature,
    Intervention(InterventionKind),
    ToggleIntervention(InterventionKind),
}

impl FromStr for FieldPath {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.trim();
        let simple = match path {
            "date" => Some(Self::Date),
            "card_no" => Some(Self::CardNo),
            "customer" => Some(Self::Customer),
            "types" => Some(Self::Types),
            "brands" => Some(Self::Brands),
            "models" => Some(Self::Models),
            "fault_reported" => Some(Self::FaultReported),
            "fault_found" => Some(Self::FaultFound),
            "intervention_description" => Some(Self::InterventionDescription),
            "total_hours" => Some(Self::TotalHours),
            "km_travelled" => Some(Self::KmTravelled),
            "hourly_cost" => Some(Self::HourlyCost),
            "km_cost" => Some(Self::KmCost),
            "signatures.responsible" => Some(Self::Responsible),
            "signatures.signature_date" => Some(Self::SignatureDate),
            "signatures.customer_signature" => Some(Self::CustomerSignature),
            _ => None,
        };
        if let Some(field) = simple {
            return Ok(field);
        }

        if let Some(kind) = path.strip_prefix("intervention.") {
            return kind
                .parse::<InterventionKind>()
                .map(Self::Intervention)
                .map_err(|reason| SheetError::invalid_field(path, reason));
        }

        if let Some(rest) = path.strip_prefix("parts.") {
            let (index, field) = rest.split_once('.').ok_or_else(|| {
                SheetError::invalid_field(path, "expected parts.<row>.<field>")
            })?;
            let index = index
                .parse::<usize>()
                .map_err(|_| SheetError::invalid_field(path, "part row must be a number"))?;
            let field = match field {
                "description" => PartField::Description,
                "quantity" => PartField::Quantity,
                "unit_price" => PartField::UnitPrice,
                other => {
                    return Err(SheetError::invalid_field(
                        path,
                        format!("unknown part field '{}'", other),
                    ))
                }
            };
            return Ok(Self::Part(index, field));
        }

        Err(SheetError::invalid_field(path, "unknown form field"))
    }
}

/// One user change: a control and the raw text it now holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub path: FieldPath,
    pub raw: String,
    label: String,
}

impl FieldEdit {
    pub fn new(path: &str, raw: impl Into<String>) -> Result<Self> {
        Ok(Self {
            path: path.parse()?,
            raw: raw.into(),
            label: path.trim().to_string(),
        })
    }

    /// A click on a checkbox: flips its current state.
    pub fn toggle(kind: InterventionKind) -> Self {
        Self {
            path: FieldPath::ToggleIntervention(kind),
            raw: String::new(),
            label: format!("intervention.{}", kind.key()),
        }
    }

    fn write_into(&self, report: &mut ServiceReport) -> Result<()> {
        let raw = self.raw.as_str();
        match &self.path {
            FieldPath::Date => report.date = self.date_value()?,
            FieldPath::CardNo => report.card_no = raw.to_string(),
            FieldPath::Customer => report.customer = raw.to_string(),
            FieldPath::Types => report.types = raw.to_string(),
            FieldPath::Brands => report.brands = raw.to_string(),
            FieldPath::Models => report.models = raw.to_string(),
            FieldPath::FaultReported => report.fault_reported = raw.to_string(),
            FieldPath::FaultFound => report.fault_found = raw.to_string(),
            FieldPath::InterventionDescription => {
                report.intervention_description = raw.to_string()
            }
            FieldPath::TotalHours => report.labor.total_hours = coerce_number(raw),
            FieldPath::KmTravelled => report.labor.km_travelled = coerce_number(raw),
            FieldPath::HourlyCost => report.labor.hourly_cost = coerce_number(raw),
            FieldPath::KmCost => report.labor.km_cost = coerce_number(raw),
            FieldPath::Part(index, field) => {
                let rows = report.parts.len();
                let part = report.parts.get_mut(*index).ok_or_else(|| {
                    SheetError::invalid_field(
                        &self.label,
                        format!("the sheet has {} part rows", rows),
                    )
                })?;
                match field {
                    PartField::Description => part.description = raw.to_string(),
                    PartField::Quantity => part.quantity = coerce_number(raw),
                    PartField::UnitPrice => part.unit_price = coerce_number(raw),
                }
            }
            FieldPath::Responsible => report.signatures.responsible = raw.to_string(),
            FieldPath::SignatureDate => report.signatures.signature_date = self.date_value()?,
            FieldPath::CustomerSignature => {
                report.signatures.customer_signature = raw.to_string()
            }
            FieldPath::Intervention(kind) => {
                if self.checkbox_value()? {
                    report.interventions.insert(*kind);
                } else {
                    report.interventions.remove(kind);
                }
            }
            FieldPath::ToggleIntervention(kind) => {
                if !report.interventions.remove(kind) {
                    report.interventions.insert(*kind);
                }
            }
        }
        Ok(())
    }

    /// Checkbox edits set the state named by the raw text.
    fn checkbox_value(&self) -> Result<bool> {
        match self.raw.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "x" => Ok(true),
            "off" | "false" | "0" | "" => Ok(false),
            other => Err(SheetError::invalid_field(
                &self.label,
                format!("expected on or off, got '{}'", other),
            )),
        }
    }

    fn date_value(&self) -> Result<Option<chrono::NaiveDate>> {
        parse_date_control(&self.raw).map_err(|e| {
            SheetError::invalid_field(&self.label, format!("expected YYYY-MM-DD ({})", e))
        })
    }
}

impl FromStr for FieldEdit {
    type Err = SheetError;

    /// Parses `path=value`; the value may be empty or contain further `=`.
    fn from_str(s: &str) -> Result<Self> {
        let (path, raw) = s
            .split_once('=')
            .ok_or_else(|| SheetError::invalid_field(s, "expected path=value"))?;
        Self::new(path, raw)
    }
}

impl fmt::Display for FieldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.label, self.raw)
    }
}
