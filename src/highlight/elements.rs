// * Text-element selection shared by scoring and highlighting.
// * Prefer the first content region selector with a match, else every p/h1-h6/li;
// * then always drop anything in the exclusion taxonomy or the projector's own UI.

use crate::dom;
use crate::refinery::taxonomy::{
    PROJECTOR_SELECTOR, TEXT_EXCLUDE_SELECTOR, TEXT_FALLBACK_SELECTOR, TEXT_REGION_SELECTORS,
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::trace;

/// Ordered, de-duplicated list of the document's scoreable text elements
pub fn select_text_elements(document: &Html) -> Vec<NodeId> {
    let region = TEXT_REGION_SELECTORS.iter().enumerate().find_map(|(i, selector)| {
        let found: Vec<ElementRef<'_>> = dom::select_attached(document, selector).collect();
        (!found.is_empty()).then_some((i, found))
    });

    let candidates = match region {
        Some((index, found)) => {
            trace!(selector_index = index, matches = found.len(), "using content region");
            found
        }
        None => dom::select_attached(document, &TEXT_FALLBACK_SELECTOR).collect(),
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|e| is_scoreable(*e))
        .map(|e| e.id())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// False for elements in (or under) the exclusion taxonomy or a projector subtree
pub fn is_scoreable(element: ElementRef<'_>) -> bool {
    !dom::closest(element, &TEXT_EXCLUDE_SELECTOR) && !dom::closest(element, &PROJECTOR_SELECTOR)
}
