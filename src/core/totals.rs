//! Document totals: parts + labor, then VAT on top.
//!
//! All sums run on unrounded values; rounding to cents only happens when a
//! total is formatted for display.

use crate::domain::model::{LaborInputs, LineItem, Totals, VAT_RATE};

pub fn parts_subtotal(parts: &[LineItem]) -> f64 {
    parts.iter().map(LineItem::line_total).sum()
}

pub fn labor_subtotal(labor: &LaborInputs) -> f64 {
    (labor.total_hours * labor.hourly_cost) + (labor.km_travelled * labor.km_cost)
}

pub fn compute_totals(parts: &[LineItem], labor: &LaborInputs) -> Totals {
    let parts_subtotal = parts_subtotal(parts);
    let labor_subtotal = labor_subtotal(labor);
    let taxable_total = parts_subtotal + labor_subtotal;
    let tax = taxable_total * VAT_RATE;

    Totals {
        parts_subtotal,
        labor_subtotal,
        taxable_total,
        tax,
        grand_total: taxable_total + tax,
    }
}
