// * The Refinery (Extraction Pipeline)
// * Container Locator -> (Noise Filter -> Section Segmenter) | Heuristic Fallback.
// * Nothing here mutates the live document; the container is cleaned on a detached clone.

pub mod container;
pub mod fallback;
pub mod metadata;
pub mod noise_filter;
pub mod segmenter;
pub mod taxonomy;

// * Re-exports for convenient access
pub use container::{is_valid_container, locate};
pub use fallback::{fallback, FallbackContent};
pub use metadata::{extract_metadata, extract_title, PageMetadata};
pub use noise_filter::{clean, clone_container, ContainerClone};
pub use segmenter::{drop_short_sections, segment, ContentItem, ItemType, Section, SectionType};

use crate::dom;
use crate::dom::text::word_count;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main text and its sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub sections: Vec<Section>,
    /// Whether a validated container was used (false = fallback mode)
    pub from_container: bool,
}

/// Everything handed to the summarization collaborator for a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub title: String,
    pub content: String,
    pub sections: Vec<Section>,
    pub metadata: PageMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub word_count: usize,
}

impl PageContent {
    /// Converts to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Extracts the main content: container path when one validates, fallback otherwise.
///
/// Never fails; a page with nothing usable yields empty text and no sections.
pub fn extract_main_content(document: &Html) -> ExtractedContent {
    let cleaned = locate(document)
        .and_then(|id| clone_container(document, id))
        .map(clean);

    if let Some(clone) = cleaned {
        if let Some(container) = dom::element_ref(&clone.fragment, clone.container) {
            let sections = drop_short_sections(segment(container));
            let text = sections
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            return ExtractedContent {
                text,
                sections,
                from_container: true,
            };
        }
    }

    let FallbackContent { text, sections } = fallback(document);
    ExtractedContent {
        text,
        sections,
        from_container: false,
    }
}

/// Builds the full page payload: title, main content, sections, metadata
pub fn extract_page(document: &Html, url: Option<&str>) -> PageContent {
    let content = extract_main_content(document);
    let page = PageContent {
        title: extract_title(document),
        word_count: word_count(&content.text),
        content: content.text,
        sections: content.sections,
        metadata: extract_metadata(document),
        url: url.map(str::to_string),
    };

    info!(
        title = %page.title,
        sections = page.sections.len(),
        words = page.word_count,
        from_container = content.from_container,
        "page content extracted"
    );
    page
}
