//! Formatters for law texts, publisher documents and uploaded chat documents

use super::format_date;
use super::non_empty;
use super::relevance_annotation;
use crate::models::ChatDocumentChunk;
use crate::models::LawPublisherDocument;
use crate::models::PublisherDocumentType;
use crate::models::Scored;
use crate::models::TaxLawDocument;

const PUBLISHER_SEPARATOR: &str = "\n---\n\n";

/// `<citation> - <title>:` followed by the text, entries separated by a blank line.
///
/// Relevance is carried by the citation list, not by this block.
pub fn format_tax_law(matches: &[Scored<TaxLawDocument>]) -> String {
    matches
        .iter()
        .map(|m| {
            let doc = &m.record;
            format!("{} - {}:\n{}\n", doc.citation, doc.title, doc.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_law_publishers(matches: &[Scored<LawPublisherDocument>]) -> String {
    matches
        .iter()
        .map(format_publisher_document)
        .collect::<Vec<_>>()
        .join(PUBLISHER_SEPARATOR)
}

fn format_publisher_document(m: &Scored<LawPublisherDocument>) -> String {
    let doc = &m.record;
    let kind = doc.kind();
    let label = kind.map_or(doc.document_type.as_str(), |k| k.label());

    let mut lines = vec![format!(
        "[{label}] {} {}",
        doc.title,
        relevance_annotation(m.similarity)
    )];

    match kind {
        Some(PublisherDocumentType::CaseLaw) => {
            let mut reference: Vec<&str> = Vec::new();
            if let Some(court) = non_empty(doc.court.as_ref()) {
                reference.push(court);
            }
            if let Some(case_number) = non_empty(doc.case_number.as_ref()) {
                reference.push(case_number);
            }
            let mut line = reference.join(" ");
            if let Some(date) = doc.decision_date {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&format!("vom {}", format_date(date)));
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }
        Some(PublisherDocumentType::Commentary | PublisherDocumentType::Article) | None => {
            let mut origin = Vec::new();
            if let Some(author) = non_empty(doc.author.as_ref()) {
                origin.push(format!("Autor: {author}"));
            }
            if let Some(publisher) = non_empty(doc.publisher.as_ref()) {
                origin.push(format!("Verlag: {publisher}"));
            }
            if !origin.is_empty() {
                lines.push(origin.join(" | "));
            }
        }
    }

    if let Some(law_reference) = non_empty(doc.law_reference.as_ref()) {
        lines.push(format!("Norm: {law_reference}"));
    }
    if let Some(citation) = non_empty(doc.citation.as_ref()) {
        lines.push(format!("Fundstelle: {citation}"));
    }

    let body = non_empty(doc.summary.as_ref()).unwrap_or(&doc.content);
    lines.push(body.to_string());

    lines.join("\n")
}

/// Uploaded document chunks, labelled with file name and chunk position
pub fn format_chat_documents(matches: &[Scored<ChatDocumentChunk>]) -> String {
    matches
        .iter()
        .map(|m| {
            let chunk = &m.record;
            format!(
                "[{}, Abschnitt {}] {}\n{}\n",
                chunk.file_name,
                chunk.chunk_index.saturating_add(1),
                relevance_annotation(m.similarity),
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
