// * Analysis Result Model & Response Parsing
// * Accepts fenced or bare JSON, falls back to "Summary:" / "- " text markers,
// * and never fails: unrecognized text yields placeholder summary and key points.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub const PLACEHOLDER_SUMMARY: &str = "No summary available";
pub const PLACEHOLDER_KEY_POINT: &str = "No key points extracted";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid fence regex")
});

/// Reads an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Category of a backend-scored section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    KeyPoint,
    DataPoint,
    Quote,
    ActionItem,
    #[serde(other)]
    Other,
}

/// A pre-scored section returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoredSection {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub importance: f64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: SectionKind,
}

/// Structured output of the summarization collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(alias = "key_points", deserialize_with = "null_as_default")]
    pub key_points: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ScoredSection>>,
}

impl AnalysisResult {
    /// Result used when no API key is configured
    pub fn local_fallback() -> Self {
        Self {
            summary: "Local processing result (AI service not configured)".to_string(),
            key_points: vec![
                "Content extracted successfully".to_string(),
                "Configure AI service for deeper analysis".to_string(),
                "This is a sample local processing result".to_string(),
            ],
            keywords: vec!["TLDR".to_string(), "Local".to_string(), "Processing".to_string()],
            sections: None,
        }
    }

    /// Scored sections, empty when the backend sent none
    pub fn scored_sections(&self) -> &[ScoredSection] {
        self.sections.as_deref().unwrap_or_default()
    }

    /// Trims keywords, drops blanks and duplicates, orders longest first (stable)
    pub fn normalize_keywords(&mut self) {
        self.keywords = normalize_keywords(std::mem::take(&mut self.keywords));
    }
}

/// Trims, de-duplicates and sorts keywords by descending character length
pub fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect();
    out.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    out
}

/// Parses raw backend text into an [`AnalysisResult`]
pub fn parse_response(text: &str) -> AnalysisResult {
    match parse_json(text) {
        Some(mut result) => {
            debug!(
                key_points = result.key_points.len(),
                keywords = result.keywords.len(),
                "parsed JSON analysis"
            );
            result.normalize_keywords();
            result
        }
        None => {
            debug!("response is not JSON, falling back to text markers");
            parse_text_markers(text)
        }
    }
}

fn parse_json(text: &str) -> Option<AnalysisResult> {
    let body = FENCED_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
        .trim();

    if let Ok(result) = serde_json::from_str::<AnalysisResult>(body) {
        return Some(result);
    }

    // * Prose around a bare object: retry on the outermost braces
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<AnalysisResult>(&body[start..=end]) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(error = %e, "malformed JSON in analysis response");
            None
        }
    }
}

/// Legacy format: a `Summary:` line and `- ` bulleted key points
pub fn parse_text_markers(text: &str) -> AnalysisResult {
    let mut summary = String::new();
    let mut key_points = Vec::new();

    for line in text.trim().lines() {
        let line = line.trim_end();
        if let Some(rest) = line.strip_prefix("Summary:") {
            summary = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("- ") {
            let point = rest.trim();
            if !point.is_empty() {
                key_points.push(point.to_string());
            }
        }
    }

    if summary.is_empty() {
        summary = PLACEHOLDER_SUMMARY.to_string();
    }
    if key_points.is_empty() {
        key_points.push(PLACEHOLDER_KEY_POINT.to_string());
    }

    AnalysisResult {
        summary,
        key_points,
        keywords: Vec::new(),
        sections: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"summary\":\"S\",\"keyPoints\":[\"K1\",\"K2\"],\"keywords\":[\"alpha\",\"alpha beta\"]}\n```";
        let result = parse_response(raw);

        assert_eq!(result.summary, "S");
        assert_eq!(result.key_points, vec!["K1", "K2"]);
        assert_eq!(result.keywords, vec!["alpha beta", "alpha"]);
    }

    #[test]
    fn test_bare_json_with_sections() {
        let raw = r#"{"summary":"S","keyPoints":[],"keywords":[],
            "sections":[{"text":"Revenue grew","importance":0.9,"type":"data_point"},
                        {"text":"Odd","importance":0.1,"type":"something_new"}]}"#;
        let result = parse_response(raw);

        let sections = result.scored_sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::DataPoint);
        assert_eq!(sections[1].kind, SectionKind::Other);
    }

    #[test]
    fn test_null_fields_read_as_missing() {
        let result = parse_response(r#"{"summary":"S","keyPoints":["K1"],"keywords":null}"#);
        assert_eq!(result.summary, "S");
        assert_eq!(result.key_points, vec!["K1"]);
        assert!(result.keywords.is_empty());

        let raw = r#"{"summary":null,"keyPoints":null,"keywords":["k"],
            "sections":[{"text":null,"importance":null,"type":null}]}"#;
        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.summary, "");
        assert!(result.key_points.is_empty());
        assert_eq!(result.scored_sections(), &[ScoredSection::default()]);
    }

    #[test]
    fn test_partial_json_degrades_to_empty_lists() {
        let result = parse_response(r#"{"summary":"Only a summary"}"#);

        assert_eq!(result.summary, "Only a summary");
        assert!(result.key_points.is_empty());
        assert!(result.keywords.is_empty());
        assert!(result.scored_sections().is_empty());
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "Here you go: {\"summary\":\"S\",\"keyPoints\":[\"K\"]} hope it helps";
        assert_eq!(parse_response(raw).key_points, vec!["K"]);
    }

    #[test]
    fn test_malformed_json_falls_back_to_markers() {
        let raw = "{\"summary\": broken\nSummary: Recovered summary\n- Point one\n- Point two";
        let result = parse_response(raw);

        assert_eq!(result.summary, "Recovered summary");
        assert_eq!(result.key_points, vec!["Point one", "Point two"]);
    }

    #[test]
    fn test_unrecognized_text_yields_placeholders() {
        let result = parse_response("The model rambled without any structure.");

        assert_eq!(result.summary, PLACEHOLDER_SUMMARY);
        assert_eq!(result.key_points, vec![PLACEHOLDER_KEY_POINT]);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_normalize_keywords() {
        let keywords = vec![
            " plan ".to_string(),
            "Enterprise plan".to_string(),
            "".to_string(),
            "plan".to_string(),
            "数据".to_string(),
        ];
        assert_eq!(normalize_keywords(keywords), vec!["Enterprise plan", "plan", "数据"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&AnalysisResult::local_fallback()).unwrap();
        assert!(json.contains("keyPoints"));
        assert!(!json.contains("sections"));
    }
}
