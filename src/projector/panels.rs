// * Panel Rendering
// * Builds the floating panel and the side panel as real nodes; all page-facing
// * strings go in as text nodes, never as markup.

use crate::analysis::AnalysisResult;
use crate::dom;
use crate::refinery::taxonomy::{
    CLASS_PANEL, CLASS_SIDEBAR, ID_FLOATING_PANEL, ID_SIDEBAR, ID_SIDEBAR_CONTENT,
};
use ego_tree::{NodeId, Tree};
use scraper::{Html, Node};

pub const PANEL_TITLE: &str = "TLDR Analysis";
pub const SIDEBAR_PROMPT: &str = "Run an analysis to see the page summary here.";
pub const ID_TOGGLE_HIGHLIGHTS: &str = "toggleHighlights";
pub const ID_TOGGLE_HIERARCHY: &str = "toggleHierarchy";

/// Summary, key points and (when present) keyword tags
fn append_analysis(tree: &mut Tree<Node>, parent: NodeId, analysis: &AnalysisResult, keywords: &[String]) -> Option<()> {
    let summary = dom::append_element(tree, parent, "div", &[("class", "tldr-summary")])?;
    dom::append_text_element(tree, summary, "h4", &[], "Summary")?;
    dom::append_text_element(tree, summary, "p", &[], &analysis.summary)?;

    let points = dom::append_element(tree, parent, "div", &[("class", "tldr-key-points")])?;
    dom::append_text_element(tree, points, "h4", &[], "Key Points")?;
    let list = dom::append_element(tree, points, "ul", &[])?;
    for point in &analysis.key_points {
        dom::append_text_element(tree, list, "li", &[], point)?;
    }

    if !keywords.is_empty() {
        let block = dom::append_element(tree, parent, "div", &[("class", "tldr-keywords")])?;
        dom::append_text_element(tree, block, "h4", &[], "Keywords")?;
        let tags = dom::append_element(tree, block, "div", &[("class", "tldr-keyword-tags")])?;
        for keyword in keywords {
            dom::append_text_element(tree, tags, "span", &[("class", "tldr-keyword-tag")], keyword)?;
        }
    }
    Some(())
}

/// Appends the floating panel to `<body>`, replacing an existing one
pub fn render_floating_panel(document: &mut Html, analysis: &AnalysisResult, keywords: &[String]) -> Option<NodeId> {
    if let Some(existing) = dom::element_by_id(document, ID_FLOATING_PANEL) {
        dom::detach(&mut document.tree, existing);
    }

    let body = dom::body_id(document);
    let tree = &mut document.tree;
    let panel = dom::append_element(tree, body, "div", &[("id", ID_FLOATING_PANEL), ("class", CLASS_PANEL)])?;

    let header = dom::append_element(tree, panel, "div", &[("class", "tldr-panel-header")])?;
    dom::append_text_element(tree, header, "h3", &[], PANEL_TITLE)?;
    dom::append_text_element(tree, header, "button", &[("class", "tldr-close-btn")], "×")?;

    let content = dom::append_element(tree, panel, "div", &[("class", "tldr-panel-content")])?;
    append_analysis(tree, content, analysis, keywords)?;
    Some(panel)
}

/// Appends an empty side panel holding the prompt text
pub fn render_sidebar(document: &mut Html, width: u32) -> Option<NodeId> {
    let body = dom::body_id(document);
    let width = format!("width: {width}px;");
    let tree = &mut document.tree;
    let sidebar = dom::append_element(
        tree,
        body,
        "div",
        &[("id", ID_SIDEBAR), ("class", CLASS_SIDEBAR), ("style", width.as_str())],
    )?;

    let header = dom::append_element(tree, sidebar, "div", &[("class", "tldr-sidebar-header")])?;
    dom::append_text_element(tree, header, "h3", &[], PANEL_TITLE)?;
    let controls = dom::append_element(tree, header, "div", &[("class", "tldr-sidebar-controls")])?;
    dom::append_text_element(tree, controls, "button", &[("class", "tldr-resize-btn"), ("title", "Resize")], "↔")?;
    dom::append_text_element(tree, controls, "button", &[("class", "tldr-close-sidebar")], "×")?;

    let content = dom::append_element(
        tree,
        sidebar,
        "div",
        &[("class", "tldr-sidebar-content"), ("id", ID_SIDEBAR_CONTENT)],
    )?;
    dom::append_text_element(tree, content, "p", &[], SIDEBAR_PROMPT)?;
    Some(sidebar)
}

/// Replaces the side panel's content with the analysis and the toggle controls
pub fn fill_sidebar(document: &mut Html, analysis: &AnalysisResult, keywords: &[String]) -> bool {
    let Some(content) = dom::element_by_id(document, ID_SIDEBAR_CONTENT) else {
        return false;
    };
    let tree = &mut document.tree;
    dom::clear_children(tree, content);

    let filled = append_analysis(tree, content, analysis, keywords).and_then(|_| {
        let controls = dom::append_element(tree, content, "div", &[("class", "tldr-toggle-controls")])?;
        dom::append_text_element(
            tree,
            controls,
            "button",
            &[("class", "tldr-toggle-btn"), ("id", ID_TOGGLE_HIGHLIGHTS)],
            "Toggle highlights",
        )?;
        dom::append_text_element(
            tree,
            controls,
            "button",
            &[("class", "tldr-toggle-btn"), ("id", ID_TOGGLE_HIERARCHY)],
            "Toggle hierarchy",
        )
    });
    filled.is_some()
}
