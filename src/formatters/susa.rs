//! Trial balance (SUSA) text used when DATEV accounting months are embedded

use super::format_money;
use super::non_empty;
use super::DEFAULT_CURRENCY;
use crate::models::SusaEntry;

/// One line per account with derived opening balance, movements and closing balance
pub fn format_susa_entries(entries: &[SusaEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let cur = non_empty(entry.currency.as_ref()).unwrap_or(DEFAULT_CURRENCY);
            format!(
                "{} {} | Anfangssaldo: {} | Soll: {} | Haben: {} | Endsaldo: {}",
                entry.account_number,
                entry.account_name,
                format_money(entry.opening_balance(), cur),
                format_money(entry.current_month_debit, cur),
                format_money(entry.current_month_credit, cur),
                format_money(entry.closing_balance, cur),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
