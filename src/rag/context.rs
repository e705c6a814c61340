//! Context assembly from formatted source sections

use tracing::debug;

use crate::formatters::truncate_str;

/// Context used when no source produced anything
pub const NO_CONTEXT_FALLBACK: &str = "Keine spezifischen Dokumente oder Mandanten-Daten gefunden.";

const SECTION_SEPARATOR: &str = "\n\n";
const TRUNCATION_MARKER_LEN: usize = "...".len();

/// A labelled block of formatted source text.
///
/// A section carries either its own body or a list of sub-sections rendered
/// under `--- <header> ---` lines (one level deep).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSection {
    pub header: String,
    pub body: String,
    pub subsections: Vec<ContextSection>,
}

impl ContextSection {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            subsections: Vec::new(),
        }
    }

    /// A section made of the non-empty `subsections`; empty when all of them are
    pub fn nested(header: impl Into<String>, subsections: Vec<Self>) -> Self {
        Self {
            header: header.into(),
            body: String::new(),
            subsections: subsections
                .into_iter()
                .filter(|section| !section.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty() && self.subsections.iter().all(Self::is_empty)
    }

    fn render(&self) -> String {
        self.render_within(usize::MAX)
    }

    /// Render in at most `budget` characters, shortening bodies rather than omitting them.
    ///
    /// Headers are always kept, so a budget smaller than the headers is exceeded.
    fn render_within(&self, budget: usize) -> String {
        let heading = format!("=== {} ===\n", self.header);
        let available = budget.saturating_sub(char_len(&heading));

        if self.subsections.is_empty() {
            return heading + &fit_text(self.body.trim_end(), available);
        }

        let subheadings: Vec<String> = self
            .subsections
            .iter()
            .map(|section| format!("--- {} ---\n", section.header))
            .collect();
        let separators = SECTION_SEPARATOR.len() * (self.subsections.len() - 1);
        let lengths: Vec<usize> = self
            .subsections
            .iter()
            .zip(&subheadings)
            .map(|(section, subheading)| char_len(subheading) + char_len(section.body.trim_end()))
            .collect();
        let shares = fair_shares(&lengths, available.saturating_sub(separators));

        let parts: Vec<String> = self
            .subsections
            .iter()
            .zip(subheadings)
            .zip(shares)
            .map(|((section, subheading), share)| {
                let body_budget = share.saturating_sub(char_len(&subheading));
                subheading + &fit_text(section.body.trim_end(), body_budget)
            })
            .collect();

        heading + &parts.join(SECTION_SEPARATOR)
    }
}

/// Joins non-empty sections in the given order, up to a size bound
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    /// Create a new context assembler
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Render non-empty sections separated by blank lines.
    ///
    /// Every non-empty section appears. When the full text exceeds the bound, the
    /// budget is split so that sections shorter than an even share stay whole and
    /// the longer ones are shortened. Returns an empty string only when every
    /// section is empty.
    #[must_use]
    pub fn assemble(&self, sections: &[ContextSection]) -> String {
        let sections: Vec<&ContextSection> =
            sections.iter().filter(|section| !section.is_empty()).collect();
        let rendered: Vec<String> = sections.iter().map(|section| section.render()).collect();

        let separators = SECTION_SEPARATOR.len() * sections.len().saturating_sub(1);
        let lengths: Vec<usize> = rendered.iter().map(|text| char_len(text)).collect();
        let total = lengths.iter().sum::<usize>() + separators;

        if total <= self.max_context_length {
            return rendered.join(SECTION_SEPARATOR);
        }

        debug!(
            "Context of {} characters exceeds bound of {}, shortening longest sections",
            total, self.max_context_length
        );

        let shares = fair_shares(&lengths, self.max_context_length.saturating_sub(separators));
        sections
            .iter()
            .zip(rendered)
            .zip(lengths)
            .zip(shares)
            .map(|(((section, text), length), share)| {
                if length <= share {
                    text
                } else {
                    section.render_within(share)
                }
            })
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(crate::config::default_max_context_length())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// `text` unchanged when it fits, otherwise cut on a character boundary with a `...` marker
fn fit_text(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        text.to_string()
    } else {
        truncate_str(text, max_chars.saturating_sub(TRUNCATION_MARKER_LEN))
    }
}

/// Split `budget` over items: items not longer than an even share of what is left
/// keep their length, the rest share the remainder equally.
fn fair_shares(lengths: &[usize], budget: usize) -> Vec<usize> {
    let mut shares = vec![0; lengths.len()];
    let mut open: Vec<usize> = (0..lengths.len()).collect();
    let mut remaining = budget;

    while !open.is_empty() {
        let share = remaining / open.len();
        let (fitting, over): (Vec<usize>, Vec<usize>) =
            open.into_iter().partition(|&idx| lengths[idx] <= share);

        if fitting.is_empty() {
            for idx in over {
                shares[idx] = share;
            }
            break;
        }

        for idx in fitting {
            shares[idx] = lengths[idx];
            remaining -= lengths[idx];
        }
        open = over;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_are_omitted() {
        let assembler = ContextAssembler::default();
        let context = assembler.assemble(&[
            ContextSection::new("STEUERRECHTLICHE GRUNDLAGEN", "§ 18 UStG - Besteuerungsverfahren:\n...\n"),
            ContextSection::new("RECHTSPRECHUNG & KOMMENTARE", ""),
            ContextSection::new("HOCHGELADENE DOKUMENTE", "  \n"),
        ]);
        assert_eq!(
            context,
            "=== STEUERRECHTLICHE GRUNDLAGEN ===\n§ 18 UStG - Besteuerungsverfahren:\n..."
        );
    }

    #[test]
    fn test_sections_keep_given_order() {
        let context = ContextAssembler::default().assemble(&[
            ContextSection::new("A", "eins"),
            ContextSection::new("B", "zwei"),
        ]);
        assert_eq!(context, "=== A ===\neins\n\n=== B ===\nzwei");
    }

    #[test]
    fn test_all_empty_yields_empty_string() {
        let context = ContextAssembler::default().assemble(&[ContextSection::new("A", "")]);
        assert!(context.is_empty());
    }

    #[test]
    fn test_nested_sections() {
        let datev = ContextSection::nested(
            "DATEV DATEN",
            vec![
                ContextSection::new("Mandanten", "Mustermann GmbH (100% relevant)"),
                ContextSection::new("Ansprechpartner", ""),
                ContextSection::new("Aufträge", "JA 2023 (70% relevant)"),
            ],
        );
        assert_eq!(datev.subsections.len(), 2);
        assert_eq!(
            datev.render(),
            "=== DATEV DATEN ===\n--- Mandanten ---\nMustermann GmbH (100% relevant)\n\n--- Aufträge ---\nJA 2023 (70% relevant)"
        );

        let empty = ContextSection::nested("DATEV DATEN", vec![ContextSection::new("Mandanten", "")]);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_bound_shortens_long_section_and_keeps_later_ones() {
        let assembler = ContextAssembler::new(60);
        let context = assembler.assemble(&[
            ContextSection::new("A", "x".repeat(200)),
            ContextSection::new("B", "kurz"),
        ]);

        assert!(context.chars().count() <= 60, "{context}");
        assert!(context.starts_with("=== A ===\nxxx"));
        assert!(context.contains("...\n\n=== B ===\nkurz"));
    }

    #[test]
    fn test_bound_shortens_inside_nested_section() {
        let assembler = ContextAssembler::new(120);
        let context = assembler.assemble(&[
            ContextSection::new("A", "eins"),
            ContextSection::nested(
                "DATEV DATEN",
                vec![
                    ContextSection::new("Aufträge", "y".repeat(300)),
                    ContextSection::new("Personal", "Erika Musterfrau"),
                ],
            ),
        ]);

        assert!(context.chars().count() <= 120, "{context}");
        assert!(context.starts_with("=== A ===\neins\n\n=== DATEV DATEN ===\n--- Aufträge ---\nyyy"));
        assert!(context.ends_with("...\n\n--- Personal ---\nErika Musterfrau"));
    }

    #[test]
    fn test_bound_cuts_on_character_boundary() {
        let assembler = ContextAssembler::new(30);
        let context = assembler.assemble(&[ContextSection::new("Ä", "ö".repeat(100))]);
        assert_eq!(context.chars().count(), 30);
        assert!(context.ends_with("ööö..."));
    }

    #[test]
    fn test_fair_shares() {
        assert_eq!(fair_shares(&[10, 500, 20], 100), vec![10, 70, 20]);
        assert_eq!(fair_shares(&[300, 300], 100), vec![50, 50]);
        assert_eq!(fair_shares(&[5, 5], 100), vec![5, 5]);
        assert!(fair_shares(&[], 100).is_empty());
    }
}
