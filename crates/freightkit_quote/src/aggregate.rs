//! Row totals with validity filtering.

use freightkit_io_xlsx::SpecTable;
use log::debug;

use crate::extract::extract_rows;
use crate::spec::{QuoteError, SpecColumnSet, SpecPortCost, SpecQuotationRow};

/// Extract `column_set` from `table` and total every valid row.
pub fn aggregate(
    table: &SpecTable,
    column_set: &SpecColumnSet,
) -> Result<Vec<SpecPortCost>, QuoteError> {
    let l_rows = extract_rows(table, column_set)?;
    let n_rows = l_rows.len();
    let l_costs = aggregate_rows(l_rows);
    debug!(
        "Aggregated {}: {} of {} rows priced",
        table.sheet_name,
        l_costs.len(),
        n_rows
    );
    Ok(l_costs)
}

/// Total every row whose port is non-blank and whose primary cost is
/// present and positive; missing components add nothing.
pub fn aggregate_rows(rows: Vec<SpecQuotationRow>) -> Vec<SpecPortCost> {
    rows.into_iter()
        .filter(|row| !row.port.is_empty())
        .filter(|row| {
            row.cost_components
                .first()
                .copied()
                .flatten()
                .is_some_and(|n_primary| n_primary > 0.0)
        })
        .map(|row| SpecPortCost {
            total_cost: Some(row.cost_components.iter().flatten().sum()),
            port: row.port,
            carrier: row.carrier,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_row(port: &str, costs: &[Option<f64>]) -> SpecQuotationRow {
        SpecQuotationRow {
            port: port.to_string(),
            carrier: None,
            cost_components: costs.to_vec(),
        }
    }

    #[test]
    fn zero_primary_rate_is_not_offered() {
        let l_costs = aggregate_rows(vec![create_row("X", &[Some(0.0), Some(5.0)])]);
        assert!(l_costs.is_empty());
    }

    #[test]
    fn missing_components_contribute_nothing() {
        let l_costs = aggregate_rows(vec![create_row("X", &[Some(10.0), None, Some(5.0)])]);
        assert_eq!(
            l_costs,
            vec![SpecPortCost {
                port: "X".to_string(),
                carrier: None,
                total_cost: Some(15.0),
            }]
        );
    }

    #[test]
    fn negative_missing_primary_and_blank_port_are_dropped() {
        let l_costs = aggregate_rows(vec![
            create_row("X", &[Some(-1.0), Some(5.0)]),
            create_row("Y", &[None, Some(5.0)]),
            create_row("", &[Some(10.0)]),
            create_row("Z", &[Some(1.5), Some(2.5)]),
        ]);
        assert_eq!(l_costs.len(), 1);
        assert_eq!(l_costs[0].port, "Z");
        assert_eq!(l_costs[0].total_cost, Some(4.0));
    }
}
