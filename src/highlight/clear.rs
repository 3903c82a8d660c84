// * Highlight & Hierarchy Reversal
// * Full teardown back to the pre-analysis document; safe to run repeatedly.

use crate::dom;
use crate::highlight::styling::{restore_element, STYLED_SELECTOR};
use crate::refinery::taxonomy::{MARKER_SELECTOR, PROJECTOR_SELECTOR};
use ego_tree::NodeId;
use scraper::Html;
use serde::Serialize;
use tracing::info;

/// What a clear pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub markers: usize,
    pub restyled: usize,
    pub panels: usize,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.markers == 0 && self.restyled == 0 && self.panels == 0
    }
}

fn unwrap_markers(document: &mut Html) -> usize {
    let markers = dom::select_ids(document, &MARKER_SELECTOR);
    let mut parents: Vec<NodeId> = Vec::new();

    for marker in &markers {
        let Some(node) = document.tree.get(*marker) else {
            continue;
        };
        // * Markers never nest, but a marker detached with an earlier one is skipped
        let Some(parent) = node.parent().map(|p| p.id()) else {
            continue;
        };
        let text = dom::text_content(node);
        dom::replace_with_text(&mut document.tree, *marker, &text);
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    for parent in parents {
        dom::merge_adjacent_text_nodes(&mut document.tree, parent);
    }
    markers.len()
}

fn restore_styled(document: &mut Html) -> usize {
    let styled = dom::select_ids(document, &STYLED_SELECTOR);
    for id in &styled {
        restore_element(document, *id);
    }
    styled.len()
}

fn remove_projector_ui(document: &mut Html) -> usize {
    let roots: Vec<NodeId> = dom::select_attached(document, &PROJECTOR_SELECTOR)
        .filter(|e| {
            // * Only outermost subtrees; nested ones leave with their parent
            !e.ancestors()
                .filter_map(scraper::ElementRef::wrap)
                .any(|a| PROJECTOR_SELECTOR.matches(&a))
        })
        .map(|e| e.id())
        .collect();

    for id in &roots {
        dom::detach(&mut document.tree, *id);
    }
    roots.len()
}

/// Removes every marker, importance style and projector panel.
///
/// Markers become plain text and the resulting adjacent text runs are merged;
/// styled elements get their original inline style back. A no-op on a clean document.
pub fn clear(document: &mut Html) -> ClearReport {
    let report = ClearReport {
        markers: unwrap_markers(document),
        restyled: restore_styled(document),
        panels: remove_projector_ui(document),
    };

    if !report.is_empty() {
        info!(
            markers = report.markers,
            restyled = report.restyled,
            panels = report.panels,
            "highlight state cleared"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::highlighter::highlight;
    use crate::highlight::scorer::CLASS_MEDIUM;
    use crate::highlight::styling::apply_class_style;

    fn body_text(document: &Html) -> String {
        dom::text_content(document.tree.root())
    }

    #[test]
    fn test_highlight_then_clear_restores_text_and_structure() {
        let source = r#"<html><body><p>alpha <b>beta</b> alpha gamma</p><p>nothing</p></body></html>"#;
        let mut doc = Html::parse_document(source);
        let pristine = Html::parse_document(source);

        assert_eq!(highlight(&mut doc, &["alpha".to_string(), "beta".to_string()]), 3);
        let report = clear(&mut doc);

        assert_eq!(report.markers, 3);
        assert_eq!(body_text(&doc), body_text(&pristine));
        assert_eq!(doc.root_element().html(), pristine.root_element().html());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut doc = Html::parse_document(r#"<html><body><p>alpha beta</p></body></html>"#);
        highlight(&mut doc, &["alpha".to_string()]);

        let first = clear(&mut doc);
        let snapshot = doc.root_element().html();
        let second = clear(&mut doc);

        assert!(!first.is_empty());
        assert!(second.is_empty());
        assert_eq!(doc.root_element().html(), snapshot);
    }

    #[test]
    fn test_clear_on_untouched_document_is_noop() {
        let source = "<html><body><p>plain</p></body></html>";
        let mut doc = Html::parse_document(source);

        assert!(clear(&mut doc).is_empty());
        assert_eq!(doc.root_element().html(), Html::parse_document(source).root_element().html());
    }

    #[test]
    fn test_clear_removes_styles_and_panels() {
        let mut doc = Html::parse_document(
            r#"<html><body><p>text</p>
               <div id="tldr-floating-panel" class="tldr-panel"><div class="tldr-keyword-tooltip">x</div></div>
               <div class="tldr-keyword-tooltip">y</div></body></html>"#,
        );
        let p = dom::select_ids(&doc, &scraper::Selector::parse("p").unwrap())[0];
        apply_class_style(&mut doc, p, CLASS_MEDIUM, &[("opacity", "0.8")]);

        let report = clear(&mut doc);
        assert_eq!(report.restyled, 1);
        assert_eq!(report.panels, 2);
        assert_eq!(dom::get_attr(&doc, p, "style"), None);
        assert_eq!(dom::get_attr(&doc, p, "class"), None);
        assert!(dom::select_attached(&doc, &PROJECTOR_SELECTOR).next().is_none());
    }
}
