// * Marker Interactions
// * Hover neutralises a marker's highlight style until the pointer leaves; click
// * surfaces a short-lived keyword callout.

use crate::config::constants::CALLOUT_LIFETIME_MS;
use crate::dom;
use crate::refinery::taxonomy::{CLASS_MARKER, CLASS_TOOLTIP};
use ego_tree::NodeId;
use scraper::Html;
use std::time::{Duration, Instant};
use tracing::debug;

pub const ATTR_SAVED_STYLE: &str = "data-tldr-saved-style";
pub const HOVER_TITLE: &str = "Hover to see the original style";

// * Style that makes a marker look like the surrounding text
pub const NEUTRAL_MARKER_STYLE: &[(&str, &str)] = &[
    ("background-color", "transparent"),
    ("color", "inherit"),
    ("font-weight", "normal"),
    ("padding", "0"),
    ("border-radius", "0"),
    ("border", "none"),
];

/// A keyword callout awaiting expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callout {
    pub id: NodeId,
    pub expires_at: Instant,
}

pub fn is_marker(document: &Html, id: NodeId) -> bool {
    dom::is_attached(document, id) && dom::has_class(document, id, CLASS_MARKER)
}

/// Pointer enters a marker: remember its style, then neutralise it
pub fn enter(document: &mut Html, marker: NodeId) -> bool {
    if !is_marker(document, marker) {
        return false;
    }
    if dom::get_attr(document, marker, ATTR_SAVED_STYLE).is_none() {
        let current = dom::get_attr(document, marker, "style").unwrap_or_default();
        dom::set_attr(&mut document.tree, marker, ATTR_SAVED_STYLE, &current);
    }
    dom::set_style(&mut document.tree, marker, NEUTRAL_MARKER_STYLE);
    dom::set_attr(&mut document.tree, marker, "title", HOVER_TITLE)
}

/// Pointer leaves a marker: restore the remembered style
pub fn leave(document: &mut Html, marker: NodeId) -> bool {
    if !is_marker(document, marker) {
        return false;
    }
    let Some(saved) = dom::get_attr(document, marker, ATTR_SAVED_STYLE) else {
        return false;
    };

    if saved.trim().is_empty() {
        dom::remove_attr(&mut document.tree, marker, "style");
    } else {
        dom::set_attr(&mut document.tree, marker, "style", &saved);
    }
    dom::remove_attr(&mut document.tree, marker, ATTR_SAVED_STYLE);
    dom::remove_attr(&mut document.tree, marker, "title")
}

/// Click on a marker: append a callout for its keyword to `<body>`
pub fn click(document: &mut Html, marker: NodeId, now: Instant) -> Option<Callout> {
    if !is_marker(document, marker) {
        return None;
    }
    let keyword = dom::element_text(document, marker)?;

    let body = dom::body_id(document);
    let tree = &mut document.tree;
    let callout = dom::append_element(tree, body, "div", &[("class", CLASS_TOOLTIP)])?;
    let content = dom::append_element(tree, callout, "div", &[("class", "tldr-tooltip-content")])?;
    dom::append_text_element(tree, content, "h4", &[], &format!("Keyword: {keyword}"))?;
    dom::append_text_element(tree, content, "p", &[], "A key term identified by the analysis")?;
    dom::append_text_element(tree, content, "button", &[("class", "tldr-tooltip-close")], "Close")?;

    debug!(keyword = %keyword, "keyword callout shown");
    Some(Callout {
        id: callout,
        expires_at: now + Duration::from_millis(CALLOUT_LIFETIME_MS),
    })
}
