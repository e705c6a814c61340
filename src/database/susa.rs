use super::Database;
use crate::errors::Result;
use crate::errors::TaxRagError;
use crate::models::SusaEntry;

impl Database {
    /// Trial balance lines of one client for one month, ordered by account
    ///
    /// # Errors
    /// - `ConfigError` when `month` is outside `1..=12`
    /// - Database errors
    pub async fn get_susa_entries(
        &self,
        client_id: &str,
        fiscal_year: i32,
        month: u8,
    ) -> Result<Vec<SusaEntry>> {
        let month = checked_month(month)?;

        let entries = sqlx::query_as::<_, SusaEntry>(
            r"
            SELECT
                account_number, account_name, closing_balance,
                current_month_debit, current_month_credit, currency
            FROM datev_susa
            WHERE client_id = $1 AND fiscal_year = $2 AND month = $3
            ORDER BY account_number
            ",
        )
        .bind(client_id)
        .bind(fiscal_year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

fn checked_month(month: u8) -> Result<i32> {
    if (1..=12).contains(&month) {
        Ok(i32::from(month))
    } else {
        Err(TaxRagError::ConfigError(format!(
            "month must be within 1..=12, got {month}"
        )))
    }
}
