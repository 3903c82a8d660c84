// * Heuristic Fallback Extractor
// * Deliberately degraded mode for pages without a valid container: flat paragraphs, no headings.

use crate::config::constants::{MAX_FALLBACK_PARAGRAPHS, MIN_FALLBACK_PARAGRAPH_CHARS};
use crate::dom;
use crate::dom::text::char_len;
use crate::refinery::segmenter::Section;
use crate::refinery::taxonomy::FALLBACK_NOISE_SELECTOR;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static SELECTOR_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid paragraph selector"));

/// Flat extraction result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackContent {
    /// First paragraphs joined by blank lines
    pub text: String,
    /// One `paragraph` section per kept paragraph, with its index
    pub sections: Vec<Section>,
}

/// Extracts up to the first fifteen substantial paragraphs outside noise regions
pub fn fallback(document: &Html) -> FallbackContent {
    let paragraphs: Vec<String> = dom::select_attached(document, &SELECTOR_PARAGRAPH)
        .filter(|p| !dom::closest(*p, &FALLBACK_NOISE_SELECTOR))
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| char_len(text) > MIN_FALLBACK_PARAGRAPH_CHARS)
        .take(MAX_FALLBACK_PARAGRAPHS)
        .collect();

    debug!(paragraphs = paragraphs.len(), "fallback extraction");

    FallbackContent {
        text: paragraphs.join("\n\n"),
        sections: paragraphs
            .into_iter()
            .enumerate()
            .map(|(index, text)| Section::paragraph(index, text))
            .collect(),
    }
}
