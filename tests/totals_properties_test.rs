use proptest::prelude::*;
use service_sheet::core::totals::{labor_subtotal, parts_subtotal};
use service_sheet::{compute_totals, FieldEdit, FormState, LaborInputs, LineItem, VAT_RATE};

fn line_item() -> impl Strategy<Value = LineItem> {
    (0u32..100, 0.0f64..10_000.0).prop_map(|(qty, price)| LineItem::new("", f64::from(qty), price))
}

fn labor() -> impl Strategy<Value = LaborInputs> {
    (1u32..=10, 0.0f64..5_000.0, 0.0f64..500.0, 0.0f64..5.0).prop_map(
        |(hours, km, hourly, per_km)| LaborInputs {
            total_hours: f64::from(hours),
            km_travelled: km,
            hourly_cost: hourly,
            km_cost: per_km,
        },
    )
}

fn tolerance(magnitude: f64) -> f64 {
    1e-9 * magnitude.abs().max(1.0)
}

proptest! {
    #[test]
    fn taxable_total_is_parts_plus_labor(parts in prop::collection::vec(line_item(), 0..10), labor in labor()) {
        let totals = compute_totals(&parts, &labor);
        prop_assert_eq!(totals.taxable_total, parts_subtotal(&parts) + labor_subtotal(&labor));
        prop_assert_eq!(totals.taxable_total, totals.parts_subtotal + totals.labor_subtotal);
    }

    #[test]
    fn tax_is_fixed_rate_of_taxable(parts in prop::collection::vec(line_item(), 0..10), labor in labor()) {
        let totals = compute_totals(&parts, &labor);
        prop_assert!((totals.tax - totals.taxable_total * 0.22).abs() <= tolerance(totals.tax));
        prop_assert_eq!(VAT_RATE, 0.22);
    }

    #[test]
    fn grand_total_is_taxable_plus_tax(parts in prop::collection::vec(line_item(), 0..10), labor in labor()) {
        let totals = compute_totals(&parts, &labor);
        prop_assert_eq!(totals.grand_total, totals.taxable_total + totals.tax);
    }

    #[test]
    fn recomputation_is_idempotent(parts in prop::collection::vec(line_item(), 0..10), labor in labor()) {
        prop_assert_eq!(compute_totals(&parts, &labor), compute_totals(&parts, &labor));
    }

    #[test]
    fn edited_state_matches_fresh_recomputation(
        row in 0usize..5,
        qty in 0u32..50,
        price in 0.0f64..1_000.0,
        hours in 1u32..=10,
    ) {
        let start = FormState::default();
        let edits: Vec<FieldEdit> = vec![
            FieldEdit::new(&format!("parts.{}.quantity", row), qty.to_string()).unwrap(),
            FieldEdit::new(&format!("parts.{}.unit_price", row), price.to_string()).unwrap(),
            FieldEdit::new("total_hours", hours.to_string()).unwrap(),
        ];
        let state = start.apply_all(&edits).unwrap();

        let fresh = compute_totals(&state.report().parts, &state.report().labor);
        prop_assert_eq!(*state.totals(), fresh);
        prop_assert_eq!(start.totals().grand_total, 0.0);
    }
}
