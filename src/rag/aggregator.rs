//! Fan-out over all enabled sources and assembly of the context bundle

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::citations::chat_document_citations;
use super::citations::law_publisher_citations;
use super::citations::tax_law_citations;
use super::ContextAssembler;
use super::ContextSection;
use super::SourceKind;
use super::DATEV_HEADER;
use super::NO_CONTEXT_FALLBACK;
use crate::config::AppConfig;
use crate::config::RetrievalConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::embeddings::EmbeddingProvider;
use crate::errors::Result;
use crate::formatters;
use crate::models::BuildContextOptions;
use crate::models::ContextBundle;
use crate::models::DatevClient;
use crate::models::Scored;
use crate::search::SearchBackends;
use crate::search::SearchParams;
use crate::search::VectorSearchAdapter;

/// Relevance attached to a client fetched by id rather than ranked
const DIRECT_LOOKUP_SIMILARITY: f64 = 1.0;

/// Builds prompt context and citations for one query at a time.
///
/// Holds no per-call state; a single instance can serve concurrent requests.
pub struct ContextAggregator {
    embeddings: Arc<dyn EmbeddingProvider>,
    backends: SearchBackends,
    retrieval: RetrievalConfig,
    assembler: ContextAssembler,
}

impl ContextAggregator {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        backends: SearchBackends,
        retrieval: RetrievalConfig,
    ) -> Self {
        let assembler = ContextAssembler::new(retrieval.max_context_length);
        Self {
            embeddings,
            backends,
            retrieval,
            assembler,
        }
    }

    /// Connect to Postgres and the configured embedding endpoint
    ///
    /// # Errors
    /// - Database connection errors
    /// - Embedding client configuration errors (unknown provider, HTTP client build)
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embeddings = Arc::new(EmbeddingClient::from_app_config(config)?);

        Ok(Self::new(
            embeddings,
            SearchBackends::from_database(database),
            config.retrieval.clone(),
        ))
    }

    /// Build the context for `query`.
    ///
    /// Never fails: a source whose search errors contributes nothing, and when no
    /// source contributes the context is [`NO_CONTEXT_FALLBACK`].
    pub async fn build_context(&self, query: &str, options: &BuildContextOptions) -> ContextBundle {
        let limits = options.limits.unwrap_or(self.retrieval.limits);
        let threshold = self.retrieval.similarity_threshold;
        let client_id = options.client_id.as_deref();

        info!(
            "Building context (client: {}, chat: {}, law publishers: {})",
            client_id.unwrap_or("-"),
            options.chat_id.as_deref().unwrap_or("-"),
            options.law_publishers_enabled()
        );

        let embedding = match self.embeddings.embed(query).await {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                warn!("Query embedding failed, skipping all similarity searches: {}", e);
                None
            }
        };
        let embedding = embedding.as_deref();

        let datev_params = |limit: u32| SearchParams::new(threshold, limit).with_client(client_id);

        let tax_law = run_source(
            SourceKind::TaxLaw,
            self.backends.tax_law.as_ref(),
            embedding,
            SearchParams::new(threshold, limits.tax_law),
        );
        let law_publishers = async {
            if options.law_publishers_enabled() {
                run_source(
                    SourceKind::LawPublishers,
                    self.backends.law_publishers.as_ref(),
                    embedding,
                    SearchParams::new(threshold, limits.law_publishers),
                )
                .await
            } else {
                Vec::new()
            }
        };
        let chat_documents = async {
            match options.chat_id.as_deref() {
                Some(chat_id) => {
                    run_source(
                        SourceKind::ChatDocuments,
                        self.backends.chat_documents.as_ref(),
                        embedding,
                        SearchParams::new(threshold, limits.chat_documents).with_chat(Some(chat_id)),
                    )
                    .await
                }
                None => Vec::new(),
            }
        };
        let clients = async {
            match client_id {
                Some(client_id) => self.lookup_client(client_id).await,
                None => {
                    run_source(
                        SourceKind::DatevClients,
                        self.backends.datev_clients.as_ref(),
                        embedding,
                        SearchParams::new(threshold, limits.datev_clients),
                    )
                    .await
                }
            }
        };
        let addressees = run_source(
            SourceKind::DatevAddressees,
            self.backends.datev_addressees.as_ref(),
            embedding,
            datev_params(limits.datev_addressees),
        );
        let orders = run_source(
            SourceKind::DatevOrders,
            self.backends.datev_orders.as_ref(),
            embedding,
            datev_params(limits.datev_orders),
        );
        let corporate_tax = run_source(
            SourceKind::DatevCorporateTax,
            self.backends.datev_corporate_tax.as_ref(),
            embedding,
            datev_params(limits.datev_corporate_tax),
        );
        let trade_tax = run_source(
            SourceKind::DatevTradeTax,
            self.backends.datev_trade_tax.as_ref(),
            embedding,
            datev_params(limits.datev_trade_tax),
        );
        let analytics = run_source(
            SourceKind::DatevAnalytics,
            self.backends.datev_analytics.as_ref(),
            embedding,
            datev_params(limits.datev_analytics),
        );
        let employees = run_source(
            SourceKind::DatevHr,
            self.backends.datev_hr.as_ref(),
            embedding,
            datev_params(limits.datev_hr),
        );

        let (
            tax_law,
            law_publishers,
            chat_documents,
            clients,
            addressees,
            orders,
            corporate_tax,
            trade_tax,
            analytics,
            employees,
        ) = tokio::join!(
            tax_law,
            law_publishers,
            chat_documents,
            clients,
            addressees,
            orders,
            corporate_tax,
            trade_tax,
            analytics,
            employees
        );

        let datev = ContextSection::nested(
            DATEV_HEADER,
            vec![
                section(SourceKind::DatevClients, formatters::format_datev_clients(&clients)),
                section(
                    SourceKind::DatevAddressees,
                    formatters::format_datev_addressees(&addressees),
                ),
                section(SourceKind::DatevOrders, formatters::format_datev_orders(&orders)),
                section(
                    SourceKind::DatevCorporateTax,
                    formatters::format_datev_corporate_tax(&corporate_tax),
                ),
                section(
                    SourceKind::DatevTradeTax,
                    formatters::format_datev_trade_tax(&trade_tax),
                ),
                section(
                    SourceKind::DatevAnalytics,
                    formatters::format_datev_analytics(&analytics),
                ),
                section(SourceKind::DatevHr, formatters::format_datev_employees(&employees)),
            ],
        );
        let sections = [
            section(SourceKind::TaxLaw, formatters::format_tax_law(&tax_law)),
            section(
                SourceKind::LawPublishers,
                formatters::format_law_publishers(&law_publishers),
            ),
            section(
                SourceKind::ChatDocuments,
                formatters::format_chat_documents(&chat_documents),
            ),
            datev,
        ];

        let mut context = self.assembler.assemble(&sections);
        if context.is_empty() {
            debug!("No source produced context, using fallback");
            context = NO_CONTEXT_FALLBACK.to_string();
        }

        let preview_length = self.retrieval.citation_preview_length;
        let mut citations = tax_law_citations(&tax_law, preview_length);
        citations.extend(law_publisher_citations(&law_publishers, preview_length));
        citations.extend(chat_document_citations(&chat_documents, preview_length));

        info!(
            "Context built: {} characters, {} citations",
            context.chars().count(),
            citations.len()
        );

        ContextBundle { context, citations }
    }

    /// Exact client record for an explicitly selected client, bypassing the threshold
    async fn lookup_client(&self, client_id: &str) -> Vec<Scored<DatevClient>> {
        match self.backends.client_lookup.get_client(client_id).await {
            Ok(Some(client)) => vec![Scored::new(client, DIRECT_LOOKUP_SIMILARITY)],
            Ok(None) => {
                debug!("Client {} not found", client_id);
                Vec::new()
            }
            Err(e) => {
                warn!("Client lookup for {} failed: {}", client_id, e);
                Vec::new()
            }
        }
    }
}

fn section(source: SourceKind, body: String) -> ContextSection {
    ContextSection::new(source.header(), body)
}

/// Run one source search; any failure degrades to an empty match list
async fn run_source<T: Send + 'static>(
    source: SourceKind,
    adapter: &dyn VectorSearchAdapter<T>,
    embedding: Option<&[f32]>,
    params: SearchParams,
) -> Vec<Scored<T>> {
    let Some(embedding) = embedding else {
        return Vec::new();
    };

    match adapter.search(embedding, &params).await {
        Ok(matches) => {
            debug!("{}: {} matches", source.name(), matches.len());
            matches
        }
        Err(e) => {
            warn!("{} search failed, continuing without it: {}", source.name(), e);
            Vec::new()
        }
    }
}
