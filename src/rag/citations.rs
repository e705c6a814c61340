//! Citation records for the sources shown to the user.
//!
//! Only tax law, publisher documents and uploaded documents are cited. DATEV data
//! feeds the context but never the citation list.

use crate::formatters::non_empty;
use crate::formatters::relevance_percent;
use crate::formatters::truncate_str;
use crate::models::ChatDocumentChunk;
use crate::models::Citation;
use crate::models::LawPublisherDocument;
use crate::models::Scored;
use crate::models::TaxLawDocument;

pub const TAX_LAW_SOURCE: &str = "Steuerrecht";
pub const CHAT_DOCUMENT_SOURCE: &str = "Hochgeladenes Dokument";

pub fn tax_law_citations(matches: &[Scored<TaxLawDocument>], preview_length: usize) -> Vec<Citation> {
    matches
        .iter()
        .map(|m| Citation {
            id: m.record.id.clone(),
            source: TAX_LAW_SOURCE.to_string(),
            title: format!(
                "{} - {} ({}% relevant)",
                m.record.citation,
                m.record.title,
                relevance_percent(m.similarity)
            ),
            content: truncate_str(&m.record.content, preview_length),
        })
        .collect()
}

pub fn law_publisher_citations(
    matches: &[Scored<LawPublisherDocument>],
    preview_length: usize,
) -> Vec<Citation> {
    matches
        .iter()
        .map(|m| {
            let doc = &m.record;
            let label = doc.kind().map_or(doc.document_type.as_str(), |k| k.label());
            let source = non_empty(doc.publisher.as_ref()).unwrap_or(label);
            let body = non_empty(doc.summary.as_ref()).unwrap_or(&doc.content);

            Citation {
                id: doc.id.clone(),
                source: source.to_string(),
                title: format!(
                    "[{label}] {} ({}% relevant)",
                    doc.title,
                    relevance_percent(m.similarity)
                ),
                content: truncate_str(body, preview_length),
            }
        })
        .collect()
}

pub fn chat_document_citations(
    matches: &[Scored<ChatDocumentChunk>],
    preview_length: usize,
) -> Vec<Citation> {
    matches
        .iter()
        .map(|m| Citation {
            id: m.record.id.clone(),
            source: CHAT_DOCUMENT_SOURCE.to_string(),
            title: format!(
                "{}, Abschnitt {} ({}% relevant)",
                m.record.file_name,
                m.record.chunk_index.saturating_add(1),
                relevance_percent(m.similarity)
            ),
            content: truncate_str(&m.record.content, preview_length),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_law_citation_title_and_preview() {
        let citations = tax_law_citations(
            &[Scored::new(
                TaxLawDocument {
                    id: "ustg-18".to_string(),
                    citation: "§ 18 UStG".to_string(),
                    title: "Besteuerungsverfahren".to_string(),
                    content: "Der Unternehmer hat bis zum zehnten Tag".to_string(),
                },
                0.834,
            )],
            16,
        );
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].id, "ustg-18");
        assert_eq!(citations[0].source, "Steuerrecht");
        assert_eq!(citations[0].title, "§ 18 UStG - Besteuerungsverfahren (83% relevant)");
        assert_eq!(citations[0].content, "Der Unternehmer ...");
    }

    #[test]
    fn test_publisher_citation_source_falls_back_to_label() {
        let doc = LawPublisherDocument {
            id: "lp-7".to_string(),
            title: "Urteil zu Werbungskosten".to_string(),
            content: "Volltext".to_string(),
            summary: Some("Leitsatz".to_string()),
            document_type: "case_law".to_string(),
            court: Some("BFH".to_string()),
            case_number: None,
            decision_date: None,
            author: None,
            publisher: None,
            law_reference: None,
            citation: None,
        };
        let mut with_publisher = doc.clone();
        with_publisher.publisher = Some("NWB".to_string());

        let citations = law_publisher_citations(
            &[Scored::new(doc, 0.5), Scored::new(with_publisher, 0.45)],
            500,
        );
        assert_eq!(citations[0].source, "Rechtsprechung");
        assert_eq!(citations[0].title, "[Rechtsprechung] Urteil zu Werbungskosten (50% relevant)");
        assert_eq!(citations[0].content, "Leitsatz");
        assert_eq!(citations[1].source, "NWB");
    }

    #[test]
    fn test_chat_document_citation() {
        let citations = chat_document_citations(
            &[Scored::new(
                ChatDocumentChunk {
                    id: "chunk-3".to_string(),
                    chat_id: "chat-1".to_string(),
                    document_id: "doc-1".to_string(),
                    file_name: "Bescheid.pdf".to_string(),
                    chunk_index: 0,
                    content: "Festsetzung".to_string(),
                },
                0.66,
            )],
            500,
        );
        assert_eq!(citations[0].source, "Hochgeladenes Dokument");
        assert_eq!(citations[0].title, "Bescheid.pdf, Abschnitt 1 (66% relevant)");
    }

    #[test]
    fn test_chat_document_citation_last_chunk_index() {
        let citations = chat_document_citations(
            &[Scored::new(
                ChatDocumentChunk {
                    id: "chunk-x".to_string(),
                    chat_id: "chat-1".to_string(),
                    document_id: "doc-1".to_string(),
                    file_name: "Archiv.pdf".to_string(),
                    chunk_index: i32::MAX,
                    content: "Ende".to_string(),
                },
                0.5,
            )],
            500,
        );
        assert_eq!(
            citations[0].title,
            format!("Archiv.pdf, Abschnitt {} (50% relevant)", i32::MAX)
        );
    }
}
