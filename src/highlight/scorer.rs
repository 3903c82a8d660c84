// * Relevance Scorer
// * score = base + min(keywords * 0.2, 0.4) + key point overlap + position + length, clamped to 1.0

use crate::analysis::{AnalysisResult, ScoredSection};
use crate::config::constants::{
    IMPORTANCE_HIGH_THRESHOLD, IMPORTANCE_MEDIUM_THRESHOLD, KEY_POINT_PREFIX_CHARS,
    LENGTH_BONUS_CHARS, POSITION_BONUS_FRACTION, SCORE_BASE, SCORE_KEYWORD_CAP,
    SCORE_KEY_POINT_BONUS, SCORE_LENGTH_BONUS, SCORE_MAX, SCORE_PER_KEYWORD,
    SCORE_POSITION_BONUS, SECTION_IMPORTANCE_THRESHOLD, SECTION_MATCH_PREFIX_CHARS,
};
use crate::dom;
use crate::dom::text::{char_len, prefix};
use crate::highlight::elements::select_text_elements;
use ego_tree::NodeId;
use regex::{Regex, RegexBuilder};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const CLASS_LOW: &str = "tldr-low-importance";
pub const CLASS_MEDIUM: &str = "tldr-medium-importance";
pub const CLASS_HIGH: &str = "tldr-high-importance";
pub const CLASS_IMPORTANT_SECTION: &str = "tldr-important-section";

// * Inline styling of sections matched from the backend's scored list
pub const IMPORTANT_SECTION_STYLE: &[(&str, &str)] = &[
    ("background-color", "#e3f2fd"),
    ("border-radius", "4px"),
    ("padding", "8px"),
    ("margin", "8px 0"),
];

/// Visual tier derived from a relevance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceClass {
    Low,
    Medium,
    High,
}

impl ImportanceClass {
    /// `< 0.4` low, `< 0.7` medium, otherwise high
    pub fn from_score(score: f64) -> Self {
        if score < IMPORTANCE_MEDIUM_THRESHOLD {
            Self::Low
        } else if score < IMPORTANCE_HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Low => CLASS_LOW,
            Self::Medium => CLASS_MEDIUM,
            Self::High => CLASS_HIGH,
        }
    }

    /// Inline style properties applied alongside the class
    pub fn style(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Low => &[("opacity", "0.6")],
            Self::Medium => &[("opacity", "0.8")],
            Self::High => &[
                ("opacity", "1.0"),
                ("border-left", "3px solid #2196f3"),
                ("padding-left", "8px"),
            ],
        }
    }
}

/// One scored text element and its index in the scoreable list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredElement {
    pub position: usize,
    pub id: NodeId,
    pub score: f64,
}

/// Precomputed inputs for scoring every text element of one document
pub struct ScoringContext<'a> {
    analysis: &'a AnalysisResult,
    keyword_patterns: Vec<Regex>,
    elements: Vec<NodeId>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(document: &Html, analysis: &'a AnalysisResult) -> Self {
        // * Density counts literal, case-insensitive occurrences
        let keyword_patterns = analysis
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .filter_map(|k| {
                RegexBuilder::new(&regex::escape(k))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect();

        Self {
            analysis,
            keyword_patterns,
            elements: select_text_elements(document),
        }
    }

    /// Scoreable elements in document order
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    /// Scores one element; elements outside the scoreable set get no positional bonus
    pub fn score(&self, document: &Html, element: NodeId) -> f64 {
        let Some(text) = dom::element_text(document, element) else {
            return 0.0;
        };
        let position = self.elements.iter().position(|id| *id == element);
        self.score_text(&text, position)
    }

    /// Scores element text at an optional position in the scoreable list
    pub fn score_text(&self, text: &str, position: Option<usize>) -> f64 {
        let text = text.trim();
        if text.is_empty() {
            return 0.0;
        }

        let mut score = SCORE_BASE;

        let matches: usize = self
            .keyword_patterns
            .iter()
            .map(|re| re.find_iter(text).count())
            .sum();
        if matches > 0 {
            score += (matches as f64 * SCORE_PER_KEYWORD).min(SCORE_KEYWORD_CAP);
        }

        if self.overlaps_key_point(text) {
            score += SCORE_KEY_POINT_BONUS;
        }

        if let Some(position) = position {
            if (position as f64) < self.elements.len() as f64 * POSITION_BONUS_FRACTION {
                score += SCORE_POSITION_BONUS;
            }
        }

        if char_len(text) > LENGTH_BONUS_CHARS {
            score += SCORE_LENGTH_BONUS;
        }

        score.min(SCORE_MAX)
    }

    fn overlaps_key_point(&self, text: &str) -> bool {
        let text_head = prefix(text, KEY_POINT_PREFIX_CHARS);
        self.analysis
            .key_points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .any(|point| {
                text.contains(prefix(point, KEY_POINT_PREFIX_CHARS)) || point.contains(text_head)
            })
    }

    /// Every scoreable element with its score, in document order
    pub fn score_all(&self, document: &Html) -> Vec<ScoredElement> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                let text = dom::element_text(document, *id)?;
                Some(ScoredElement {
                    position,
                    id: *id,
                    score: self.score_text(&text, Some(position)),
                })
            })
            .collect()
    }
}

/// Scores a single element against an analysis result
pub fn score(document: &Html, element: NodeId, analysis: &AnalysisResult) -> f64 {
    ScoringContext::new(document, analysis).score(document, element)
}

/// Fuzzy section matcher: elements whose text contains the first 50 characters
/// of a section scored above 0.7. Approximate by nature; zero or many matches.
pub fn match_section(document: &Html, elements: &[NodeId], section: &ScoredSection) -> Vec<NodeId> {
    if section.importance <= SECTION_IMPORTANCE_THRESHOLD {
        return Vec::new();
    }
    let needle = prefix(section.text.trim(), SECTION_MATCH_PREFIX_CHARS);
    if needle.is_empty() {
        return Vec::new();
    }

    elements
        .iter()
        .copied()
        .filter(|id| {
            document
                .tree
                .get(*id)
                .map(|n| dom::text_content(n).contains(needle))
                .unwrap_or(false)
        })
        .collect()
}

/// Union of [`match_section`] over all sections, without duplicates
pub fn match_sections(document: &Html, elements: &[NodeId], sections: &[ScoredSection]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    sections
        .iter()
        .flat_map(|s| match_section(document, elements, s))
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SectionKind;

    fn analysis(keywords: &[&str], key_points: &[&str]) -> AnalysisResult {
        AnalysisResult {
            summary: "S".to_string(),
            key_points: key_points.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            sections: None,
        }
    }

    fn page(paragraphs: usize) -> Html {
        let body: String = (0..paragraphs)
            .map(|i| format!("<p>Paragraph number {i} talks about things.</p>"))
            .collect();
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn test_importance_thresholds() {
        assert_eq!(ImportanceClass::from_score(0.0), ImportanceClass::Low);
        assert_eq!(ImportanceClass::from_score(0.39), ImportanceClass::Low);
        assert_eq!(ImportanceClass::from_score(0.4), ImportanceClass::Medium);
        assert_eq!(ImportanceClass::from_score(0.69), ImportanceClass::Medium);
        assert_eq!(ImportanceClass::from_score(0.7), ImportanceClass::High);
        assert_eq!(ImportanceClass::from_score(1.0), ImportanceClass::High);
    }

    #[test]
    fn test_base_and_position_bonus() {
        let doc = page(10);
        let result = analysis(&[], &[]);
        let ctx = ScoringContext::new(&doc, &result);

        assert_eq!(ctx.elements().len(), 10);
        let scores = ctx.score_all(&doc);
        // * First 30% (positions 0..3) earn the positional bonus
        assert!((scores[0].score - 0.5).abs() < 1e-9);
        assert!((scores[2].score - 0.5).abs() < 1e-9);
        assert!((scores[3].score - 0.3).abs() < 1e-9);
        assert_eq!(scores[3].position, 3);
    }

    #[test]
    fn test_keyword_density_is_capped() {
        let doc = page(1);
        let result = analysis(&["alpha"], &[]);
        let ctx = ScoringContext::new(&doc, &result);

        let one = ctx.score_text("alpha", None);
        let five = ctx.score_text("alpha alpha alpha alpha alpha", None);
        assert!((one - 0.5).abs() < 1e-9);
        assert!((five - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_match_strictly_increases_score() {
        let doc = page(1);
        let result = analysis(&["Enterprise"], &[]);
        let ctx = ScoringContext::new(&doc, &result);

        let without = ctx.score_text("the basic tier starts today", Some(5));
        let with = ctx.score_text("the basic tier starts today Enterprise", Some(5));
        assert!(with > without);
    }

    #[test]
    fn test_key_point_overlap_both_directions() {
        let doc = page(1);
        let result = analysis(&[], &["Revenue grew by forty percent"]);
        let ctx = ScoringContext::new(&doc, &result);

        // * Text contains the key point's 10-character prefix
        assert!((ctx.score_text("Overall, Revenue grew sharply", None) - 0.6).abs() < 1e-9);
        // * Key point contains the text's 10-character prefix
        assert!((ctx.score_text("Revenue grew", None) - 0.6).abs() < 1e-9);
        assert!((ctx.score_text("Costs fell", None) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_clamped() {
        let doc = page(1);
        let long = format!("alpha alpha {}", "x".repeat(250));
        let result = analysis(&["alpha"], &[long.as_str()]);
        let ctx = ScoringContext::new(&doc, &result);

        let s = ctx.score_text(&long, Some(0));
        assert!(s <= 1.0);
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let doc = Html::parse_document("<html><body><p>  </p></body></html>");
        let result = analysis(&["alpha"], &[]);
        let ctx = ScoringContext::new(&doc, &result);
        let id = ctx.elements()[0];

        assert_eq!(ctx.score(&doc, id), 0.0);
    }

    #[test]
    fn test_keyword_metacharacters_are_literal() {
        let doc = page(1);
        let result = analysis(&["C++"], &[]);
        let ctx = ScoringContext::new(&doc, &result);

        assert!((ctx.score_text("We use C++ here", None) - 0.5).abs() < 1e-9);
        assert!((ctx.score_text("We use CCC here", None) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_match_sections_fuzzy_prefix() {
        let doc = Html::parse_document(
            r#"<html><body>
                <p>Quarterly revenue grew forty percent on strong enterprise demand.</p>
                <p>Unrelated paragraph about the weather.</p>
                <p>Quarterly revenue grew forty percent on strong enterprise demand, again.</p>
            </body></html>"#,
        );
        let elements = select_text_elements(&doc);
        let sections = vec![
            ScoredSection {
                text: "Quarterly revenue grew forty percent on strong enterprise demand.".to_string(),
                importance: 0.9,
                kind: SectionKind::DataPoint,
            },
            ScoredSection {
                text: "Unrelated paragraph about the weather.".to_string(),
                importance: 0.5,
                kind: SectionKind::KeyPoint,
            },
            ScoredSection {
                text: "Never appears on the page".to_string(),
                importance: 0.95,
                kind: SectionKind::Quote,
            },
        ];

        let matched = match_sections(&doc, &elements, &sections);
        assert_eq!(matched, vec![elements[0], elements[2]]);
    }
}
