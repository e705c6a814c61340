//! pgvector similarity search through per-table stored procedures
//!
//! Each record type has a `match_<table>` function with the signature
//! `(query_embedding vector, match_threshold float8, match_count int[, filter text])`
//! returning the record columns plus `similarity`, ordered best first.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use tracing::debug;

use super::Database;
use crate::errors::Result;
use crate::models::ChatDocumentChunk;
use crate::models::DatevAddressee;
use crate::models::DatevClient;
use crate::models::DatevCorporateTax;
use crate::models::DatevEmployee;
use crate::models::DatevOrder;
use crate::models::DatevOrderAnalytics;
use crate::models::DatevTradeTax;
use crate::models::LawPublisherDocument;
use crate::models::Scored;
use crate::models::TaxLawDocument;
use crate::search::SearchFilter;
use crate::search::SearchParams;
use crate::search::VectorSearchAdapter;

/// Which equality filter a stored procedure accepts as its fourth argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    None,
    ClientId,
    ChatId,
}

impl FilterColumn {
    fn value(self, filter: &SearchFilter) -> Option<Option<String>> {
        match self {
            Self::None => None,
            Self::ClientId => Some(filter.client_id.clone()),
            Self::ChatId => Some(filter.chat_id.clone()),
        }
    }
}

/// A record type searchable through a `match_*` stored procedure
pub trait SearchableRecord: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const SEARCH_FUNCTION: &'static str;
    const FILTER: FilterColumn;
}

macro_rules! searchable {
    ($record:ty, $function:literal, $filter:expr) => {
        impl SearchableRecord for $record {
            const SEARCH_FUNCTION: &'static str = $function;
            const FILTER: FilterColumn = $filter;
        }
    };
}

searchable!(TaxLawDocument, "match_tax_law_documents", FilterColumn::None);
searchable!(LawPublisherDocument, "match_law_publisher_documents", FilterColumn::None);
searchable!(ChatDocumentChunk, "match_chat_document_chunks", FilterColumn::ChatId);
searchable!(DatevClient, "match_datev_clients", FilterColumn::None);
searchable!(DatevAddressee, "match_datev_addressees", FilterColumn::ClientId);
searchable!(DatevOrder, "match_datev_orders", FilterColumn::ClientId);
searchable!(DatevCorporateTax, "match_datev_corp_tax", FilterColumn::ClientId);
searchable!(DatevTradeTax, "match_datev_trade_tax", FilterColumn::ClientId);
searchable!(DatevOrderAnalytics, "match_datev_analytics", FilterColumn::ClientId);
searchable!(DatevEmployee, "match_datev_hr_employees", FilterColumn::ClientId);

fn search_sql(function: &str, filter: FilterColumn) -> String {
    match filter {
        FilterColumn::None => format!("SELECT * FROM {function}($1, $2, $3)"),
        FilterColumn::ClientId | FilterColumn::ChatId => {
            format!("SELECT * FROM {function}($1, $2, $3, $4)")
        }
    }
}

#[async_trait]
impl<T: SearchableRecord> VectorSearchAdapter<T> for Database {
    async fn search(&self, embedding: &[f32], params: &SearchParams) -> Result<Vec<Scored<T>>> {
        let sql = search_sql(T::SEARCH_FUNCTION, T::FILTER);
        let limit = i32::try_from(params.limit).unwrap_or(i32::MAX);

        let query = sqlx::query_as::<_, Scored<T>>(&sql)
            .bind(Vector::from(embedding.to_vec()))
            .bind(params.threshold)
            .bind(limit);
        let query = match T::FILTER.value(&params.filter) {
            Some(filter_value) => query.bind(filter_value),
            None => query,
        };

        let matches = query.fetch_all(&self.pool).await?;
        debug!("{} returned {} matches", T::SEARCH_FUNCTION, matches.len());
        Ok(matches)
    }
}
