use async_trait::async_trait;

use super::Database;
use crate::errors::Result;
use crate::models::DatevClient;
use crate::search::ClientLookup;

impl Database {
    /// Get a client master record by id
    pub async fn get_datev_client(&self, client_id: &str) -> Result<Option<DatevClient>> {
        let client = sqlx::query_as::<_, DatevClient>(
            r"
            SELECT
                id, client_name, client_number, client_type, legal_form, status,
                managing_director_name, managing_director_email, managing_director_phone
            FROM datev_clients
            WHERE id = $1
            ",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }
}

#[async_trait]
impl ClientLookup for Database {
    async fn get_client(&self, client_id: &str) -> Result<Option<DatevClient>> {
        self.get_datev_client(client_id).await
    }
}
