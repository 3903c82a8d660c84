// * Keyword Highlighter
// * Text nodes are materialized before any edit. Each matching node is replaced in place
// * by its pieces: plain text runs and `<span class="tldr-highlight">` markers.
// * Nodes without a match are never touched.

use crate::analysis::normalize_keywords;
use crate::dom;
use crate::highlight::elements::select_text_elements;
use crate::highlight::tokenizer::{compile_keyword, KeywordPattern};
use crate::refinery::taxonomy::{CLASS_MARKER, MARKER_SELECTOR, PROJECTOR_SELECTOR};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const ATTR_KEYWORD: &str = "data-tldr-keyword";

// * Raw-text containers whose content is not rendered prose
static SELECTOR_RAW_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script, style, noscript, textarea, template").expect("valid raw text selector")
});

#[derive(Debug, PartialEq)]
enum Piece<'a> {
    Text(&'a str),
    Marker { keyword: &'a str, text: &'a str },
}

/// Claims non-overlapping spans, earlier patterns (longer keywords) first
fn claim_spans(text: &str, patterns: &[KeywordPattern]) -> Vec<(Range<usize>, usize)> {
    let mut claimed: Vec<(Range<usize>, usize)> = Vec::new();
    for (index, pattern) in patterns.iter().enumerate() {
        for m in pattern.regex.find_iter(text) {
            let range = m.range();
            if range.is_empty() {
                continue;
            }
            let overlaps = claimed
                .iter()
                .any(|(r, _)| range.start < r.end && r.start < range.end);
            if !overlaps {
                claimed.push((range, index));
            }
        }
    }
    claimed.sort_by_key(|(r, _)| r.start);
    claimed
}

fn split_pieces<'a>(text: &'a str, patterns: &'a [KeywordPattern]) -> Vec<Piece<'a>> {
    let spans = claim_spans(text, patterns);
    if spans.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for (range, index) in spans {
        if range.start > cursor {
            pieces.push(Piece::Text(&text[cursor..range.start]));
        }
        pieces.push(Piece::Marker {
            keyword: &patterns[index].keyword,
            text: &text[range.clone()],
        });
        cursor = range.end;
    }
    if cursor < text.len() {
        pieces.push(Piece::Text(&text[cursor..]));
    }
    pieces
}

fn is_highlightable_text(parent: ElementRef<'_>) -> bool {
    !dom::closest(parent, &MARKER_SELECTOR)
        && !dom::closest(parent, &PROJECTOR_SELECTOR)
        && !dom::closest(parent, &SELECTOR_RAW_TEXT)
}

/// Text nodes eligible for highlighting, in document order, without duplicates
fn collect_text_nodes(document: &Html, elements: &[NodeId]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for element in elements {
        let Some(node) = document.tree.get(*element) else {
            continue;
        };
        for descendant in node.descendants() {
            let Some(text) = descendant.value().as_text() else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            let Some(parent) = descendant.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if is_highlightable_text(parent) && seen.insert(descendant.id()) {
                out.push(descendant.id());
            }
        }
    }
    out
}

fn splice(document: &mut Html, text_id: NodeId, pieces: &[Piece<'_>]) -> bool {
    for piece in pieces {
        let Some(mut node) = document.tree.get_mut(text_id) else {
            return false;
        };
        match piece {
            Piece::Text(text) => {
                node.insert_before(dom::new_text(text));
            }
            Piece::Marker { keyword, text } => {
                let mut marker = node.insert_before(dom::new_element(
                    "span",
                    &[("class", CLASS_MARKER), (ATTR_KEYWORD, *keyword)],
                ));
                marker.append(dom::new_text(text));
            }
        }
    }
    dom::detach(&mut document.tree, text_id);
    true
}

/// Wraps keyword occurrences in the page's text elements with markers.
///
/// Returns how many text nodes received at least one marker. Stale or detached
/// nodes are skipped silently.
pub fn highlight(document: &mut Html, keywords: &[String]) -> usize {
    let patterns: Vec<KeywordPattern> = normalize_keywords(keywords.to_vec())
        .iter()
        .filter_map(|k| compile_keyword(k))
        .collect();
    if patterns.is_empty() {
        debug!("no usable keywords, nothing to highlight");
        return 0;
    }

    let elements = select_text_elements(document);
    let text_nodes = collect_text_nodes(document, &elements);

    let mut count = 0;
    for text_id in text_nodes {
        if !dom::is_attached(document, text_id) {
            continue;
        }
        let Some(text) = document
            .tree
            .get(text_id)
            .and_then(|n| n.value().as_text())
            .map(|t| (**t).to_string())
        else {
            continue;
        };

        let pieces = split_pieces(&text, &patterns);
        if pieces.is_empty() {
            continue;
        }
        if splice(document, text_id, &pieces) {
            count += 1;
        }
    }

    info!(
        keywords = patterns.len(),
        elements = elements.len(),
        highlighted = count,
        "keywords highlighted"
    );
    count
}

/// Ids of every attached marker, in document order
pub fn markers(document: &Html) -> Vec<NodeId> {
    dom::select_ids(document, &MARKER_SELECTOR)
}
