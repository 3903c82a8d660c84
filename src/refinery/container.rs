// * Container Locator
// * Finds the single subtree most likely to be the article body.
// * Landmarks first, then content classes; the first candidate that validates wins.

use crate::config::constants::{MAX_NOISE_TEXT_RATIO, MIN_CONTAINER_PARAGRAPHS, MIN_CONTAINER_TEXT_CHARS};
use crate::dom;
use crate::dom::text::char_len;
use crate::refinery::taxonomy::{
    CONTAINER_NOISE_SELECTORS, CONTENT_CLASS_SELECTORS, LANDMARK_SELECTORS,
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static SELECTOR_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid paragraph selector"));

/// Locates the primary content container, or `None` when no candidate validates.
///
/// Only the first match of each selector is considered, and no later category is
/// tried once a candidate passes. The result is never cached: the page may change
/// between calls.
pub fn locate(document: &Html) -> Option<NodeId> {
    let candidates = LANDMARK_SELECTORS
        .iter()
        .chain(CONTENT_CLASS_SELECTORS.iter());

    for selector in candidates {
        if let Some(element) = dom::select_attached(document, selector).next() {
            if is_valid_container(element) {
                debug!(tag = element.value().name(), "content container located");
                return Some(element.id());
            }
        }
    }

    debug!("no content container passed validation");
    None
}

/// Validates a candidate container.
///
/// Rejects short text, fewer than two paragraphs, or a noise descendant whose
/// text exceeds the allowed share of the container's text.
pub fn is_valid_container(element: ElementRef<'_>) -> bool {
    let text: String = element.text().collect();
    let total = char_len(text.trim());

    if total < MIN_CONTAINER_TEXT_CHARS {
        return false;
    }

    if element.select(&SELECTOR_PARAGRAPH).count() < MIN_CONTAINER_PARAGRAPHS {
        return false;
    }

    let limit = total as f64 * MAX_NOISE_TEXT_RATIO;
    for selector in CONTAINER_NOISE_SELECTORS.iter() {
        if let Some(noise) = element.select(selector).next() {
            let noise_text: String = noise.text().collect();
            if char_len(noise_text.trim()) as f64 > limit {
                debug!(
                    noise = noise.value().name(),
                    noise_chars = char_len(noise_text.trim()),
                    total_chars = total,
                    "container rejected: noise share too high"
                );
                return false;
            }
        }
    }

    true
}
