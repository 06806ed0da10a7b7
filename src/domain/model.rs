use crate::domain::coercion::lenient_number;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Number of replaced-part rows printed on a blank sheet.
pub const DEFAULT_PART_ROWS: usize = 5;

/// Value-added tax applied to the taxable total.
pub const VAT_RATE: f64 = 0.22;

/// One replaced-part row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborInputs {
    /// Hours on site, picked from 1 to 10 on the printed sheet.
    #[serde(deserialize_with = "lenient_number")]
    pub total_hours: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub km_travelled: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub hourly_cost: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub km_cost: f64,
}

impl Default for LaborInputs {
    fn default() -> Self {
        Self {
            total_hours: 1.0,
            km_travelled: 0.0,
            hourly_cost: 0.0,
            km_cost: 0.0,
        }
    }
}

/// Derived document totals. Never stored on its own; always recomputed
/// from the line items and labor inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub parts_subtotal: f64,
    pub labor_subtotal: f64,
    pub taxable_total: f64,
    pub tax: f64,
    pub grand_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InterventionKind {
    #[serde(rename = "IN LABORATORIO")]
    InLaboratorio,
    #[serde(rename = "C/O CLIENTE")]
    PressoCliente,
    #[serde(rename = "RIP. IN GARANZIA")]
    InGaranzia,
    #[serde(rename = "RIP. A CONTRATTO")]
    AContratto,
    #[serde(rename = "RIP. CON ADDEBITO")]
    ConAddebito,
    #[serde(rename = "IN CONTO ORDINE")]
    InContoOrdine,
    #[serde(rename = "RIP. SENZA ADDEBITO")]
    SenzaAddebito,
    #[serde(rename = "RESO SENZA ADDEBITO")]
    ResoSenzaAddebito,
}

impl InterventionKind {
    /// Checkbox order on the printed sheet.
    pub const ALL: [InterventionKind; 8] = [
        Self::InLaboratorio,
        Self::PressoCliente,
        Self::InGaranzia,
        Self::AContratto,
        Self::ConAddebito,
        Self::InContoOrdine,
        Self::SenzaAddebito,
        Self::ResoSenzaAddebito,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::InLaboratorio => "IN LABORATORIO",
            Self::PressoCliente => "C/O CLIENTE",
            Self::InGaranzia => "RIP. IN GARANZIA",
            Self::AContratto => "RIP. A CONTRATTO",
            Self::ConAddebito => "RIP. CON ADDEBITO",
            Self::InContoOrdine => "IN CONTO ORDINE",
            Self::SenzaAddebito => "RIP. SENZA ADDEBITO",
            Self::ResoSenzaAddebito => "RESO SENZA ADDEBITO",
        }
    }

    /// snake_case key usable in `intervention.<key>` edits.
    pub fn key(self) -> &'static str {
        match self {
            Self::InLaboratorio => "in_laboratorio",
            Self::PressoCliente => "c_o_cliente",
            Self::InGaranzia => "rip_in_garanzia",
            Self::AContratto => "rip_a_contratto",
            Self::ConAddebito => "rip_con_addebito",
            Self::InContoOrdine => "in_conto_ordine",
            Self::SenzaAddebito => "rip_senza_addebito",
            Self::ResoSenzaAddebito => "reso_senza_addebito",
        }
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterventionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted) || kind.key() == wanted)
            .ok_or_else(|| format!("unknown intervention kind '{}'", wanted))
    }
}

/// Report files and `--set` edits accept the same spellings.
impl<'de> Deserialize<'de> for InterventionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signatures {
    pub responsible: String,
    #[serde(deserialize_with = "optional_date")]
    pub signature_date: Option<NaiveDate>,
    pub customer_signature: String,
}

/// The full technical-service sheet as entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceReport {
    #[serde(deserialize_with = "optional_date")]
    pub date: Option<NaiveDate>,
    pub card_no: String,
    pub customer: String,
    pub types: String,
    pub brands: String,
    pub models: String,
    pub interventions: BTreeSet<InterventionKind>,
    pub fault_reported: String,
    pub fault_found: String,
    pub intervention_description: String,
    pub labor: LaborInputs,
    pub parts: Vec<LineItem>,
    pub signatures: Signatures,
}

impl ServiceReport {
    /// A blank sheet with `part_rows` default part rows.
    pub fn blank(part_rows: usize) -> Self {
        Self {
            date: None,
            card_no: String::new(),
            customer: String::new(),
            types: String::new(),
            brands: String::new(),
            models: String::new(),
            interventions: BTreeSet::new(),
            fault_reported: String::new(),
            fault_found: String::new(),
            intervention_description: String::new(),
            labor: LaborInputs::default(),
            parts: vec![LineItem::default(); part_rows],
            signatures: Signatures::default(),
        }
    }

    pub fn is_checked(&self, kind: InterventionKind) -> bool {
        self.interventions.contains(&kind)
    }
}

impl Default for ServiceReport {
    fn default() -> Self {
        Self::blank(DEFAULT_PART_ROWS)
    }
}

/// Parses the value of a date control: empty means unset.
pub fn parse_date_control(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(Some)
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date_control(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
