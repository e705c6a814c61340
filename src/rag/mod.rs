//! RAG (Retrieval-Augmented Generation) context assembly
//!
//! Builds the prompt context for the tax assistant from every enabled source:
//! - one query embedding, shared by all similarity searches
//! - concurrent per-source searches that fail soft to an empty result
//! - source-specific formatting into ordered, labelled sections
//! - citations for tax law, publisher documents and uploaded documents
//!
//! # Examples
//!
//! ```rust,no_run
//! use taxrag::config::AppConfig;
//! use taxrag::models::BuildContextOptions;
//! use taxrag::rag::ContextAggregator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let aggregator = ContextAggregator::from_config(&config).await?;
//!
//!     let options = BuildContextOptions::default().with_client("c-123");
//!     let bundle = aggregator.build_context("Umsatzsteuer Vorauszahlung", &options).await;
//!     println!("{}", bundle.context);
//!     println!("Citations: {}", bundle.citations.len());
//!
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod citations;
pub mod context;

pub use aggregator::ContextAggregator;
pub use context::ContextAssembler;
pub use context::ContextSection;
pub use context::NO_CONTEXT_FALLBACK;

/// The record types the aggregator can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    TaxLaw,
    LawPublishers,
    ChatDocuments,
    DatevClients,
    DatevAddressees,
    DatevOrders,
    DatevCorporateTax,
    DatevTradeTax,
    DatevAnalytics,
    DatevHr,
}

impl SourceKind {
    /// Identifier used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::TaxLaw => "tax_law",
            Self::LawPublishers => "law_publishers",
            Self::ChatDocuments => "chat_documents",
            Self::DatevClients => "datev_clients",
            Self::DatevAddressees => "datev_addressees",
            Self::DatevOrders => "datev_orders",
            Self::DatevCorporateTax => "datev_corporate_tax",
            Self::DatevTradeTax => "datev_trade_tax",
            Self::DatevAnalytics => "datev_analytics",
            Self::DatevHr => "datev_hr",
        }
    }

    /// Section header in the assembled context
    pub const fn header(self) -> &'static str {
        match self {
            Self::TaxLaw => "STEUERRECHTLICHE GRUNDLAGEN",
            Self::LawPublishers => "RECHTSPRECHUNG & KOMMENTARE",
            Self::ChatDocuments => "HOCHGELADENE DOKUMENTE",
            Self::DatevClients => "Mandanten",
            Self::DatevAddressees => "Ansprechpartner",
            Self::DatevOrders => "Aufträge",
            Self::DatevCorporateTax => "Körperschaftsteuer",
            Self::DatevTradeTax => "Gewerbesteuer",
            Self::DatevAnalytics => "Auftragsauswertung",
            Self::DatevHr => "Personal",
        }
    }
}

/// Header of the block that nests all DATEV sections
pub const DATEV_HEADER: &str = "DATEV DATEN";
