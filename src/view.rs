// 📊 Daily View - total amount per day and company
//
// Read-only over `charges`. The store does the grouping (SQL GROUP BY on
// SQLite); `group_daily_totals` is the portable version.

use crate::records::{Charge, DailyTotal};
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::info;

/// Group charges by (date key, company name) and sum their amounts.
///
/// Output is sorted ascending by date key, then company name.
pub fn group_daily_totals(charges: &[Charge]) -> Vec<DailyTotal> {
    let mut groups: BTreeMap<(String, String), f64> = BTreeMap::new();

    for charge in charges {
        *groups
            .entry((charge.date_key(), charge.company_name.clone()))
            .or_insert(0.0) += charge.amount;
    }

    groups
        .into_iter()
        .map(|((date_key, company_name), total_amount)| DailyTotal {
            date_key,
            company_name,
            total_amount,
        })
        .collect()
}

/// Run the day × company aggregate against the store.
///
/// The returned iterator is consumed once; call again to re-derive.
pub fn aggregate<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<impl Iterator<Item = DailyTotal>> {
    let totals = store
        .daily_totals()
        .context("Failed to aggregate charges by day and company")?;
    info!(groups = totals.len(), "aggregated charges");
    Ok(totals.into_iter())
}

/// One line of the printed view: `2024-01-01 - Acme Co : 15.00`
pub fn render_line(total: &DailyTotal) -> String {
    format!(
        "{} - {} : {:.2}",
        total.date_key, total.company_name, total.total_amount
    )
}
