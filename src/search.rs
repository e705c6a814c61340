//! Similarity-search boundary
//!
//! Every source the aggregator queries sits behind [`VectorSearchAdapter`]. The
//! adapter enforces the relevance threshold and returns matches already ranked;
//! the aggregator never re-checks or re-sorts them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::database::Database;
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

/// Equality filters applied by the search backend, not after the fact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub client_id: Option<String>,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub threshold: f64,
    pub limit: u32,
    pub filter: SearchFilter,
}

impl SearchParams {
    pub fn new(threshold: f64, limit: u32) -> Self {
        Self {
            threshold,
            limit,
            filter: SearchFilter::default(),
        }
    }

    #[must_use]
    pub fn with_client(mut self, client_id: Option<&str>) -> Self {
        self.filter.client_id = client_id.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_chat(mut self, chat_id: Option<&str>) -> Self {
        self.filter.chat_id = chat_id.map(str::to_string);
        self
    }
}

/// Similarity search over one record type
#[async_trait]
pub trait VectorSearchAdapter<T: Send + 'static>: Send + Sync {
    /// Matches with similarity above `params.threshold`, best first, at most `params.limit`
    async fn search(&self, embedding: &[f32], params: &SearchParams) -> Result<Vec<Scored<T>>>;
}

/// Exact lookup of a client record by id
#[async_trait]
pub trait ClientLookup: Send + Sync {
    async fn get_client(&self, client_id: &str) -> Result<Option<DatevClient>>;
}

/// The set of search backends one aggregator queries
#[derive(Clone)]
pub struct SearchBackends {
    pub tax_law: Arc<dyn VectorSearchAdapter<TaxLawDocument>>,
    pub law_publishers: Arc<dyn VectorSearchAdapter<LawPublisherDocument>>,
    pub chat_documents: Arc<dyn VectorSearchAdapter<ChatDocumentChunk>>,
    pub datev_clients: Arc<dyn VectorSearchAdapter<DatevClient>>,
    pub client_lookup: Arc<dyn ClientLookup>,
    pub datev_addressees: Arc<dyn VectorSearchAdapter<DatevAddressee>>,
    pub datev_orders: Arc<dyn VectorSearchAdapter<DatevOrder>>,
    pub datev_corporate_tax: Arc<dyn VectorSearchAdapter<DatevCorporateTax>>,
    pub datev_trade_tax: Arc<dyn VectorSearchAdapter<DatevTradeTax>>,
    pub datev_analytics: Arc<dyn VectorSearchAdapter<DatevOrderAnalytics>>,
    pub datev_hr: Arc<dyn VectorSearchAdapter<DatevEmployee>>,
}

impl SearchBackends {
    /// Serve every source from the same Postgres database
    pub fn from_database(database: Arc<Database>) -> Self {
        Self {
            tax_law: database.clone(),
            law_publishers: database.clone(),
            chat_documents: database.clone(),
            datev_clients: database.clone(),
            client_lookup: database.clone(),
            datev_addressees: database.clone(),
            datev_orders: database.clone(),
            datev_corporate_tax: database.clone(),
            datev_trade_tax: database.clone(),
            datev_analytics: database.clone(),
            datev_hr: database,
        }
    }
}
