//! Polars frames behind the optional audit workbook.

use polars::prelude::{Column, DataFrame};

use crate::spec::{BestPriceBook, QuoteError, SpecPartnerCosts};

/// Long table `PARTNER | PORT | CARRIER | COST`, one row per reduced cost.
pub fn derive_partner_costs_frame(partners: &[SpecPartnerCosts]) -> Result<DataFrame, QuoteError> {
    let mut l_partner = Vec::new();
    let mut l_port = Vec::new();
    let mut l_carrier: Vec<Option<String>> = Vec::new();
    let mut l_cost = Vec::new();
    for partner in partners {
        for cost in &partner.costs {
            l_partner.push(partner.partner_name.clone());
            l_port.push(cost.port.clone());
            l_carrier.push(cost.carrier.clone());
            l_cost.push(cost.value);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("PARTNER".into(), l_partner),
        Column::new("PORT".into(), l_port),
        Column::new("CARRIER".into(), l_carrier),
        Column::new("COST".into(), l_cost),
    ])?;
    Ok(df)
}

/// `DESTINATION | RANK | PARTNER | COST` for every entry still in `book`.
///
/// Build it before filling, since filling consumes entries.
pub fn derive_best_prices_frame(book: &BestPriceBook) -> Result<DataFrame, QuoteError> {
    let mut l_destination = Vec::new();
    let mut l_rank: Vec<u32> = Vec::new();
    let mut l_partner = Vec::new();
    let mut l_cost = Vec::new();
    for destination in book.destinations() {
        let Some(l_entries) = book.get(destination) else {
            continue;
        };
        for (n_rank, entry) in l_entries.iter().enumerate() {
            l_destination.push(entry.destination.clone());
            l_rank.push(n_rank as u32 + 1);
            l_partner.push(entry.partner_name.clone());
            l_cost.push(entry.cost);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("DESTINATION".into(), l_destination),
        Column::new("RANK".into(), l_rank),
        Column::new("PARTNER".into(), l_partner),
        Column::new("COST".into(), l_cost),
    ])?;
    Ok(df)
}
