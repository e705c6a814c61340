use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use sqlx::Row;

use crate::config::SourceLimits;

/// A record returned by a similarity search, together with its relevance score.
///
/// Matches arrive ordered by descending similarity; that ordering belongs to the
/// search backend and is never re-sorted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub record: T,
    /// Relevance in `[0, 1]`, higher is better
    pub similarity: f64,
}

impl<T> Scored<T> {
    pub const fn new(record: T, similarity: f64) -> Self {
        Self { record, similarity }
    }
}

impl<'r, T> FromRow<'r, PgRow> for Scored<T>
where
    T: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            record: T::from_row(row)?,
            similarity: row.try_get("similarity")?,
        })
    }
}

// ====== Research law sources ======

/// Tax law text (statutes, ordinances, administrative guidance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaxLawDocument {
    pub id: String,
    /// Statute reference, e.g. `§ 18 UStG`
    pub citation: String,
    pub title: String,
    pub content: String,
}

/// Document type of a law-publisher record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherDocumentType {
    CaseLaw,
    Commentary,
    Article,
}

impl PublisherDocumentType {
    /// Parse the `document_type` column; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "case_law" => Some(Self::CaseLaw),
            "commentary" => Some(Self::Commentary),
            "article" => Some(Self::Article),
            _ => None,
        }
    }

    /// German display label
    pub const fn label(self) -> &'static str {
        match self {
            Self::CaseLaw => "Rechtsprechung",
            Self::Commentary => "Kommentar",
            Self::Article => "Fachartikel",
        }
    }
}

/// Case law, commentary or article from a legal publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LawPublisherDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub document_type: String,
    pub court: Option<String>,
    pub case_number: Option<String>,
    pub decision_date: Option<NaiveDate>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub law_reference: Option<String>,
    pub citation: Option<String>,
}

impl LawPublisherDocument {
    pub fn kind(&self) -> Option<PublisherDocumentType> {
        PublisherDocumentType::parse(&self.document_type)
    }
}

// ====== DATEV master and accounting data ======

/// DATEV client type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ClientType {
    Unknown = 0,
    NaturalPerson = 1,
    SoleProprietorship = 2,
    LegalPerson = 3,
}

impl From<i32> for ClientType {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::NaturalPerson,
            2 => Self::SoleProprietorship,
            3 => Self::LegalPerson,
            _ => Self::Unknown,
        }
    }
}

impl ClientType {
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::NaturalPerson => Some("Natürliche Person"),
            Self::SoleProprietorship => Some("Einzelunternehmen"),
            Self::LegalPerson => Some("Juristische Person"),
            Self::Unknown => None,
        }
    }
}

/// DATEV addressee type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum AddresseeType {
    Unknown = 0,
    NaturalPerson = 1,
    LegalPerson = 2,
}

impl From<i32> for AddresseeType {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::NaturalPerson,
            2 => Self::LegalPerson,
            _ => Self::Unknown,
        }
    }
}

impl AddresseeType {
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::NaturalPerson => Some("Natürliche Person"),
            Self::LegalPerson => Some("Juristische Person"),
            Self::Unknown => None,
        }
    }
}

/// DATEV client master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevClient {
    pub id: String,
    pub client_name: String,
    pub client_number: Option<i64>,
    pub client_type: Option<i32>,
    pub legal_form: Option<String>,
    pub status: Option<String>,
    pub managing_director_name: Option<String>,
    pub managing_director_email: Option<String>,
    pub managing_director_phone: Option<String>,
}

/// Contact person or managing director attached to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevAddressee {
    pub id: String,
    pub client_id: Option<String>,
    pub addressee_name: String,
    pub addressee_type: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub function: Option<String>,
    pub is_legal_representative_of_company: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevOrder {
    pub id: String,
    pub client_id: Option<String>,
    pub order_name: String,
    pub order_number: Option<i64>,
    pub order_type: Option<String>,
    pub fiscal_year: Option<i32>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
}

/// Corporate income tax filing (Körperschaftsteuer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevCorporateTax {
    pub id: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub fiscal_year: i32,
    pub status: Option<String>,
    pub taxable_income: Option<Decimal>,
    pub corporate_tax: Option<Decimal>,
    pub solidarity_surcharge: Option<Decimal>,
    pub submission_date: Option<NaiveDate>,
    pub currency: Option<String>,
}

/// Trade tax filing (Gewerbesteuer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevTradeTax {
    pub id: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub fiscal_year: i32,
    pub status: Option<String>,
    pub municipality: Option<String>,
    pub assessment_rate: Option<i32>,
    pub trade_income: Option<Decimal>,
    pub trade_tax: Option<Decimal>,
    pub currency: Option<String>,
}

/// Order-value aggregate per client and year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevOrderAnalytics {
    pub id: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub fiscal_year: Option<i32>,
    pub order_count: i64,
    pub order_value: Decimal,
    pub currency: Option<String>,
}

impl DatevOrderAnalytics {
    /// Average value per order; zero when there are no orders
    pub fn average_order_value(&self) -> Decimal {
        if self.order_count == 0 {
            return Decimal::ZERO;
        }
        self.order_value / Decimal::from(self.order_count)
    }
}

/// Employee record from DATEV HR (Lohn und Gehalt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DatevEmployee {
    pub id: String,
    pub client_id: Option<String>,
    pub first_name: Option<String>,
    pub surname: String,
    pub personnel_number: Option<i64>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub weekly_working_hours: Option<Decimal>,
    pub gross_salary: Option<Decimal>,
    pub currency: Option<String>,
}

impl DatevEmployee {
    pub fn full_name(&self) -> String {
        match self.first_name.as_deref().filter(|name| !name.is_empty()) {
            Some(first) => format!("{first} {}", self.surname),
            None => self.surname.clone(),
        }
    }
}

/// One account line of a monthly trial balance (Summen- und Saldenliste)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SusaEntry {
    pub account_number: i64,
    pub account_name: String,
    pub closing_balance: Decimal,
    pub current_month_debit: Decimal,
    pub current_month_credit: Decimal,
    pub currency: Option<String>,
}

impl SusaEntry {
    /// Balance at the start of the month.
    ///
    /// DATEV does not deliver an opening balance, so it is recovered from the
    /// closing balance and the month's movements.
    pub fn opening_balance(&self) -> Decimal {
        self.closing_balance - self.current_month_debit + self.current_month_credit
    }
}

// ====== Uploaded documents ======

/// Text chunk of a document uploaded into a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatDocumentChunk {
    pub id: String,
    pub chat_id: String,
    pub document_id: String,
    pub file_name: String,
    pub chunk_index: i32,
    pub content: String,
}

// ====== Aggregation input and output ======

/// Opt-in research sources selectable in the chat UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ResearchSource {
    Handelsregister,
    GermanLaw,
    LawPublishers,
}

/// Optional scoping for a context build
#[derive(Debug, Clone, Default)]
pub struct BuildContextOptions {
    /// Restricts DATEV sources to one client and switches the client source to a direct lookup
    pub client_id: Option<String>,
    pub research_sources: Vec<ResearchSource>,
    /// Enables the uploaded-document source for this chat
    pub chat_id: Option<String>,
    /// Overrides the configured per-source limits
    pub limits: Option<SourceLimits>,
}

impl BuildContextOptions {
    #[must_use]
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn with_chat(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    #[must_use]
    pub fn with_research_source(mut self, source: ResearchSource) -> Self {
        if !self.research_sources.contains(&source) {
            self.research_sources.push(source);
        }
        self
    }

    pub fn law_publishers_enabled(&self) -> bool {
        self.research_sources.contains(&ResearchSource::LawPublishers)
    }
}

/// Reference shown to the user next to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub source: String,
    pub title: String,
    pub content: String,
}

/// Result of a context build: prompt context plus citations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub context: String,
    pub citations: Vec<Citation>,
}
