// * Presentation Projector
// * The single owner of highlight/hierarchy state. Every visual change to the page
// * goes through here, and toggles are driven by the `HighlightState` value rather
// * than by reading classes back from the document.

pub mod interactions;
pub mod panels;

use crate::analysis::AnalysisResult;
use crate::config::constants::{SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
use crate::dom;
use crate::highlight::scorer::{CLASS_IMPORTANT_SECTION, IMPORTANT_SECTION_STYLE};
use crate::highlight::styling::{apply_class_style, CLASS_HIERARCHY_DISABLED};
use crate::highlight::{
    self, extract_keywords, markers, match_sections, select_text_elements, ClearReport,
    ImportanceClass, ScoringContext,
};
use crate::refinery::taxonomy::{ID_FLOATING_PANEL, ID_SIDEBAR};
use ego_tree::NodeId;
use interactions::{Callout, NEUTRAL_MARKER_STYLE};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

// * Hierarchy styling with the visual effect switched off
const HIERARCHY_OFF_STYLE: &[(&str, &str)] = &[
    ("opacity", "1"),
    ("border-left", "none"),
    ("padding-left", "0"),
];
const HIERARCHY_PROPERTIES: &[&str] = &["opacity", "border-left", "padding-left"];

/// Which panel currently shows the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelMode {
    #[default]
    None,
    Floating,
    Sidebar,
}

/// Importance applied to one text element, addressed by its scoreable position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportanceMark {
    pub position: usize,
    pub score: f64,
    pub class: ImportanceClass,
}

/// Everything the projector has put on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightState {
    pub panel: PanelMode,
    pub keywords: Vec<String>,
    pub highlight_count: usize,
    pub marks: Vec<ImportanceMark>,
    pub important_sections: usize,
    pub highlights_visible: bool,
    pub hierarchy_visible: bool,
    pub sidebar_width: u32,
}

impl Default for HighlightState {
    fn default() -> Self {
        Self {
            panel: PanelMode::None,
            keywords: Vec::new(),
            highlight_count: 0,
            marks: Vec::new(),
            important_sections: 0,
            highlights_visible: true,
            hierarchy_visible: true,
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
        }
    }
}

impl HighlightState {
    /// True when analysis output is currently on the page
    pub fn is_active(&self) -> bool {
        self.highlight_count > 0 || !self.marks.is_empty() || self.important_sections > 0
    }

    /// Converts to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Renders analysis results onto a document and tears them down again
#[derive(Debug, Default)]
pub struct Projector {
    state: HighlightState,
    callouts: Vec<Callout>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a previously serialized state
    pub fn with_state(state: HighlightState) -> Self {
        Self {
            state,
            callouts: Vec::new(),
        }
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    /// Clears, then applies hierarchy, keyword markers, important sections and a panel
    pub fn apply(&mut self, document: &mut Html, analysis: &AnalysisResult) -> &HighlightState {
        let sidebar_open = self.state.panel == PanelMode::Sidebar;
        self.clear(document);

        self.state.marks = apply_hierarchy(document, analysis);

        let keywords = if analysis.keywords.is_empty() {
            debug!("no explicit keywords, deriving them from key points");
            extract_keywords(&analysis.key_points)
        } else {
            analysis.keywords.clone()
        };
        self.state.highlight_count = highlight::highlight(document, &keywords);

        let elements = select_text_elements(document);
        let important = match_sections(document, &elements, analysis.scored_sections());
        for id in &important {
            apply_class_style(document, *id, CLASS_IMPORTANT_SECTION, IMPORTANT_SECTION_STYLE);
        }
        self.state.important_sections = important.len();

        if sidebar_open && panels::render_sidebar(document, self.state.sidebar_width).is_some() {
            panels::fill_sidebar(document, analysis, &keywords);
            self.state.panel = PanelMode::Sidebar;
        } else if panels::render_floating_panel(document, analysis, &keywords).is_some() {
            self.state.panel = PanelMode::Floating;
        }
        self.state.keywords = keywords;

        info!(
            marks = self.state.marks.len(),
            highlights = self.state.highlight_count,
            important_sections = self.state.important_sections,
            panel = ?self.state.panel,
            "analysis projected"
        );
        &self.state
    }

    /// Full teardown; the sidebar width preference survives
    pub fn clear(&mut self, document: &mut Html) -> ClearReport {
        let report = highlight::clear(document);
        let reclaimed = dom::compact(document);
        if reclaimed > 0 {
            debug!(reclaimed, "detached nodes reclaimed");
        }
        self.callouts.clear();
        self.state = HighlightState {
            sidebar_width: self.state.sidebar_width,
            ..HighlightState::default()
        };
        report
    }

    /// Closes the floating panel (its close button)
    pub fn close_panel(&mut self, document: &mut Html) -> bool {
        let Some(panel) = dom::element_by_id(document, ID_FLOATING_PANEL) else {
            return false;
        };
        dom::detach(&mut document.tree, panel);
        if self.state.panel == PanelMode::Floating {
            self.state.panel = PanelMode::None;
        }
        true
    }

    /// Closes an open sidebar, otherwise swaps the floating panel for an empty sidebar
    pub fn toggle_sidebar(&mut self, document: &mut Html) -> PanelMode {
        if let Some(sidebar) = dom::element_by_id(document, ID_SIDEBAR) {
            dom::detach(&mut document.tree, sidebar);
            self.state.panel = PanelMode::None;
        } else {
            if let Some(panel) = dom::element_by_id(document, ID_FLOATING_PANEL) {
                dom::detach(&mut document.tree, panel);
            }
            self.state.panel = match panels::render_sidebar(document, self.state.sidebar_width) {
                Some(_) => PanelMode::Sidebar,
                None => PanelMode::None,
            };
        }
        debug!(panel = ?self.state.panel, "sidebar toggled");
        self.state.panel
    }

    /// Sets the sidebar width; widths outside 300..=600 px are rejected
    pub fn resize_sidebar(&mut self, document: &mut Html, width: u32) -> bool {
        if !(SIDEBAR_MIN_WIDTH..=SIDEBAR_MAX_WIDTH).contains(&width) {
            debug!(width, "sidebar width out of range");
            return false;
        }
        self.state.sidebar_width = width;
        if let Some(sidebar) = dom::element_by_id(document, ID_SIDEBAR) {
            let value = format!("{width}px");
            dom::set_style(&mut document.tree, sidebar, &[("width", value.as_str())]);
        }
        true
    }

    /// Shows or hides the keyword marker styling; returns the new visibility
    pub fn toggle_highlights(&mut self, document: &mut Html) -> bool {
        if self.state.highlight_count == 0 {
            return self.state.highlights_visible;
        }
        let visible = !self.state.highlights_visible;
        let properties: Vec<&str> = NEUTRAL_MARKER_STYLE.iter().map(|(p, _)| *p).collect();

        for marker in markers(document) {
            if visible {
                dom::remove_style_properties(&mut document.tree, marker, &properties);
            } else {
                dom::set_style(&mut document.tree, marker, NEUTRAL_MARKER_STYLE);
            }
        }
        self.state.highlights_visible = visible;
        visible
    }

    /// Switches the importance hierarchy off or back on; returns the new visibility
    pub fn toggle_hierarchy(&mut self, document: &mut Html) -> bool {
        if self.state.marks.is_empty() {
            debug!("no hierarchy to toggle");
            return self.state.hierarchy_visible;
        }
        let visible = !self.state.hierarchy_visible;
        let elements = select_text_elements(document);

        for mark in &self.state.marks {
            // * The page may have changed since apply; stale positions are skipped
            let Some(id) = elements.get(mark.position).copied() else {
                continue;
            };
            if visible {
                dom::remove_classes(&mut document.tree, id, &[CLASS_HIERARCHY_DISABLED]);
                dom::remove_style_properties(&mut document.tree, id, HIERARCHY_PROPERTIES);
                dom::set_style(&mut document.tree, id, mark.class.style());
            } else {
                dom::add_class(&mut document.tree, id, CLASS_HIERARCHY_DISABLED);
                dom::set_style(&mut document.tree, id, HIERARCHY_OFF_STYLE);
            }
        }
        self.state.hierarchy_visible = visible;
        visible
    }

    pub fn marker_enter(&mut self, document: &mut Html, marker: NodeId) -> bool {
        interactions::enter(document, marker)
    }

    pub fn marker_leave(&mut self, document: &mut Html, marker: NodeId) -> bool {
        interactions::leave(document, marker)
    }

    /// Shows a keyword callout that expires after the callout lifetime
    pub fn marker_click(&mut self, document: &mut Html, marker: NodeId, now: Instant) -> Option<NodeId> {
        let callout = interactions::click(document, marker, now)?;
        self.callouts.push(callout);
        Some(callout.id)
    }

    /// Removes a callout early (its close button)
    pub fn dismiss_callout(&mut self, document: &mut Html, callout: NodeId) -> bool {
        let before = self.callouts.len();
        self.callouts.retain(|c| c.id != callout);
        dom::detach(&mut document.tree, callout);
        self.callouts.len() != before
    }

    /// Removes callouts whose lifetime has passed; returns how many were removed
    pub fn expire_callouts(&mut self, document: &mut Html, now: Instant) -> usize {
        let (expired, live): (Vec<Callout>, Vec<Callout>) =
            self.callouts.drain(..).partition(|c| c.expires_at <= now);
        self.callouts = live;
        for callout in &expired {
            dom::detach(&mut document.tree, callout.id);
        }
        expired.len()
    }

    pub fn pending_callouts(&self) -> usize {
        self.callouts.len()
    }
}

/// Scores every text element and applies its importance class and style
fn apply_hierarchy(document: &mut Html, analysis: &AnalysisResult) -> Vec<ImportanceMark> {
    let scored = ScoringContext::new(document, analysis).score_all(document);

    scored
        .into_iter()
        .map(|element| {
            let class = ImportanceClass::from_score(element.score);
            apply_class_style(document, element.id, class.class_name(), class.style());
            ImportanceMark {
                position: element.position,
                score: element.score,
                class,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ScoredSection, SectionKind};
    use crate::highlight::scorer::{CLASS_HIGH, CLASS_LOW};
    use crate::refinery::taxonomy::PROJECTOR_SELECTOR;
    use std::time::Duration;

    const PAGE: &str = r#"<html><body>
        <p>Enterprise plan pricing starts at forty dollars per seat.</p>
        <p>Unrelated remarks about the office kitchen.</p>
        <p>More unrelated remarks about parking.</p>
        <p>Closing words.</p>
    </body></html>"#;

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            summary: "Pricing overview".to_string(),
            key_points: vec!["Enterprise plan pricing is per seat".to_string()],
            keywords: vec!["plan".to_string(), "Enterprise plan".to_string()],
            sections: Some(vec![ScoredSection {
                text: "Enterprise plan pricing starts at forty dollars".to_string(),
                importance: 0.9,
                kind: SectionKind::DataPoint,
            }]),
        }
    }

    fn first_p(document: &Html) -> NodeId {
        select_text_elements(document)[0]
    }

    #[test]
    fn test_apply_populates_state_and_page() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        let state = projector.apply(&mut doc, &analysis()).clone();

        assert_eq!(state.panel, PanelMode::Floating);
        assert_eq!(state.highlight_count, 1);
        assert_eq!(state.marks.len(), 4);
        assert_eq!(state.marks[0].class, ImportanceClass::High);
        assert_eq!(state.marks[3].class, ImportanceClass::Low);
        assert_eq!(state.important_sections, 1);
        assert_eq!(state.keywords, vec!["plan", "Enterprise plan"]);

        let p = first_p(&doc);
        assert!(dom::has_class(&doc, p, CLASS_HIGH));
        assert!(dom::has_class(&doc, p, CLASS_IMPORTANT_SECTION));
        assert!(dom::element_by_id(&doc, ID_FLOATING_PANEL).is_some());
    }

    #[test]
    fn test_reapply_does_not_stack() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        let first = projector.apply(&mut doc, &analysis()).clone();
        let text_once = dom::text_content(doc.tree.root());
        let second = projector.apply(&mut doc, &analysis()).clone();

        assert_eq!(first, second);
        assert_eq!(dom::text_content(doc.tree.root()), text_once);
        assert_eq!(markers(&doc).len(), 1);
        assert_eq!(dom::select_attached(&doc, &PROJECTOR_SELECTOR).count(), 1);
    }

    #[test]
    fn test_clear_restores_document() {
        let mut doc = Html::parse_document(PAGE);
        let pristine = Html::parse_document(PAGE).root_element().html();
        let mut projector = Projector::new();

        projector.apply(&mut doc, &analysis());
        projector.clear(&mut doc);

        assert_eq!(doc.root_element().html(), pristine);
        assert!(!projector.state().is_active());
        assert_eq!(projector.state().panel, PanelMode::None);
    }

    #[test]
    fn test_keywords_derived_from_key_points() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        let mut result = analysis();
        result.keywords.clear();

        let state = projector.apply(&mut doc, &result);
        assert!(!state.keywords.is_empty());
        assert!(state.highlight_count >= 1);
    }

    #[test]
    fn test_sidebar_toggle_and_resize() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        projector.apply(&mut doc, &analysis());

        assert_eq!(projector.toggle_sidebar(&mut doc), PanelMode::Sidebar);
        assert!(dom::element_by_id(&doc, ID_FLOATING_PANEL).is_none());

        assert!(!projector.resize_sidebar(&mut doc, 299));
        assert!(!projector.resize_sidebar(&mut doc, 601));
        assert!(projector.resize_sidebar(&mut doc, 600));
        let sidebar = dom::element_by_id(&doc, ID_SIDEBAR).unwrap();
        assert_eq!(dom::style_property(&doc, sidebar, "width").as_deref(), Some("600px"));

        // * A new analysis lands in the open sidebar
        projector.apply(&mut doc, &analysis());
        assert_eq!(projector.state().panel, PanelMode::Sidebar);
        assert_eq!(projector.state().sidebar_width, 600);
        assert!(dom::element_by_id(&doc, panels::ID_TOGGLE_HIERARCHY).is_some());

        assert_eq!(projector.toggle_sidebar(&mut doc), PanelMode::None);
        assert!(dom::select_attached(&doc, &PROJECTOR_SELECTOR).next().is_none());
    }

    #[test]
    fn test_toggle_hierarchy_round_trip() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        projector.apply(&mut doc, &analysis());
        let last = select_text_elements(&doc)[3];

        assert!(!projector.toggle_hierarchy(&mut doc));
        assert!(dom::has_class(&doc, last, CLASS_HIERARCHY_DISABLED));
        assert_eq!(dom::style_property(&doc, last, "opacity").as_deref(), Some("1"));

        assert!(projector.toggle_hierarchy(&mut doc));
        assert!(!dom::has_class(&doc, last, CLASS_HIERARCHY_DISABLED));
        assert!(dom::has_class(&doc, last, CLASS_LOW));
        assert_eq!(dom::style_property(&doc, last, "opacity").as_deref(), Some("0.6"));
        assert_eq!(dom::style_property(&doc, last, "border-left"), None);
    }

    #[test]
    fn test_toggle_highlights_keeps_text() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        projector.apply(&mut doc, &analysis());
        let marker = markers(&doc)[0];

        assert!(!projector.toggle_highlights(&mut doc));
        assert_eq!(
            dom::style_property(&doc, marker, "background-color").as_deref(),
            Some("transparent")
        );
        assert_eq!(dom::element_text(&doc, marker).as_deref(), Some("Enterprise plan"));

        assert!(projector.toggle_highlights(&mut doc));
        assert_eq!(dom::get_attr(&doc, marker, "style"), None);
    }

    #[test]
    fn test_toggles_without_state_are_noops() {
        let mut doc = Html::parse_document(PAGE);
        let before = doc.root_element().html();
        let mut projector = Projector::new();

        assert!(projector.toggle_highlights(&mut doc));
        assert!(projector.toggle_hierarchy(&mut doc));
        assert_eq!(doc.root_element().html(), before);
    }

    #[test]
    fn test_callouts_expire() {
        let mut doc = Html::parse_document(PAGE);
        let mut projector = Projector::new();
        projector.apply(&mut doc, &analysis());
        let marker = markers(&doc)[0];

        let start = Instant::now();
        let callout = projector.marker_click(&mut doc, marker, start).unwrap();
        assert!(dom::is_attached(&doc, callout));

        assert_eq!(projector.expire_callouts(&mut doc, start + Duration::from_millis(2_999)), 0);
        assert_eq!(projector.expire_callouts(&mut doc, start + Duration::from_millis(3_000)), 1);
        assert!(!dom::is_attached(&doc, callout));
        assert_eq!(projector.pending_callouts(), 0);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = HighlightState::default().to_json();
        assert!(json.contains("\"highlightsVisible\":true"));
        assert!(json.contains("\"sidebarWidth\":400"));
        assert!(json.contains("\"panel\":\"none\""));
    }
}
