//! Collapse many rows per port into one figure.

use std::collections::BTreeMap;

use crate::spec::{EnumReduceMode, SpecPortCost, SpecReducedPortCost};

/// One entry per distinct port, ordered by port.
///
/// Rows without a total are dropped first. `Min` keeps the first cheapest
/// row (and its shipping line) in input order; `Mean` averages and carries
/// no shipping line.
pub fn reduce_ports(costs: &[SpecPortCost], mode: EnumReduceMode) -> Vec<SpecReducedPortCost> {
    let iter_priced = costs
        .iter()
        .filter_map(|cost| cost.total_cost.map(|n_total| (cost, n_total)));

    match mode {
        EnumReduceMode::Min => {
            let mut dict_min: BTreeMap<&str, (f64, Option<&String>)> = BTreeMap::new();
            for (cost, n_total) in iter_priced {
                dict_min
                    .entry(cost.port.as_str())
                    .and_modify(|(n_min, carrier)| {
                        if n_total < *n_min {
                            *n_min = n_total;
                            *carrier = cost.carrier.as_ref();
                        }
                    })
                    .or_insert((n_total, cost.carrier.as_ref()));
            }
            dict_min
                .into_iter()
                .map(|(port, (value, carrier))| SpecReducedPortCost {
                    port: port.to_string(),
                    value,
                    carrier: carrier.cloned(),
                })
                .collect()
        }
        EnumReduceMode::Mean => {
            let mut dict_sum: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
            for (cost, n_total) in iter_priced {
                let (n_sum, n_count) = dict_sum.entry(cost.port.as_str()).or_insert((0.0, 0));
                *n_sum += n_total;
                *n_count += 1;
            }
            dict_sum
                .into_iter()
                .map(|(port, (n_sum, n_count))| SpecReducedPortCost {
                    port: port.to_string(),
                    value: n_sum / n_count as f64,
                    carrier: None,
                })
                .collect()
        }
    }
}
