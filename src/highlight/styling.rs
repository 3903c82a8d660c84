// * Reversible element styling.
// * The first time an element is styled its original inline style is snapshotted into
// * `data-tldr-style`; restoring writes the snapshot back and drops every owned class.

use crate::dom;
use crate::highlight::scorer::{CLASS_HIGH, CLASS_IMPORTANT_SECTION, CLASS_LOW, CLASS_MEDIUM};
use ego_tree::NodeId;
use scraper::{Html, Selector};
use std::sync::LazyLock;

pub const ATTR_STYLE_SNAPSHOT: &str = "data-tldr-style";
pub const CLASS_HIERARCHY_DISABLED: &str = "tldr-hierarchy-disabled";

// * Every class this crate may add to page elements
pub const OWNED_CLASSES: &[&str] = &[
    CLASS_LOW,
    CLASS_MEDIUM,
    CLASS_HIGH,
    CLASS_IMPORTANT_SECTION,
    CLASS_HIERARCHY_DISABLED,
];

pub static STYLED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    let mut parts: Vec<String> = OWNED_CLASSES.iter().map(|c| format!(".{c}")).collect();
    parts.push(format!("[{ATTR_STYLE_SNAPSHOT}]"));
    Selector::parse(&parts.join(", ")).expect("valid styled element selector")
});

fn snapshot(document: &mut Html, id: NodeId) {
    if dom::get_attr(document, id, ATTR_STYLE_SNAPSHOT).is_some() {
        return;
    }
    let original = dom::get_attr(document, id, "style").unwrap_or_default();
    dom::set_attr(&mut document.tree, id, ATTR_STYLE_SNAPSHOT, &original);
}

/// Adds `class` and inline `props`, remembering the pre-analysis style once
pub fn apply_class_style(document: &mut Html, id: NodeId, class: &str, props: &[(&str, &str)]) -> bool {
    if dom::element_ref(document, id).is_none() {
        return false;
    }
    snapshot(document, id);
    dom::add_class(&mut document.tree, id, class);
    dom::set_style(&mut document.tree, id, props)
}

/// Removes owned classes and restores the snapshotted inline style
pub fn restore_element(document: &mut Html, id: NodeId) {
    match dom::get_attr(document, id, ATTR_STYLE_SNAPSHOT) {
        Some(original) if original.trim().is_empty() => {
            dom::remove_attr(&mut document.tree, id, "style");
        }
        Some(original) => {
            dom::set_attr(&mut document.tree, id, "style", &original);
        }
        None => {}
    }
    dom::remove_attr(&mut document.tree, id, ATTR_STYLE_SNAPSHOT);
    dom::remove_classes(&mut document.tree, id, OWNED_CLASSES);
}
