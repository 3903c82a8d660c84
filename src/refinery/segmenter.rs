// * Section Segmenter
// * Groups block content under the nearest preceding heading, in document order.

use crate::config::constants::MIN_SECTION_CHARS;
use crate::dom::text::char_len;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SELECTOR_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li, blockquote").expect("valid block selector")
});

/// Kind of an extracted section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Opened by a heading element
    Heading,
    /// Synthetic headerless section for content before the first heading
    Content,
    /// Flat section produced by fallback extraction
    Paragraph,
}

/// Kind of a leaf content item, derived from its source tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Paragraph,
    ListItem,
    Quote,
    Text,
}

impl ItemType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "p" => ItemType::Paragraph,
            "li" => ItemType::ListItem,
            "blockquote" => ItemType::Quote,
            _ => ItemType::Text,
        }
    }
}

/// Leaf text extracted from one source element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub text: String,
}

/// A heading plus its content items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Heading text plus newline-joined item texts once finalized
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ContentItem>,
    /// Position in the fallback paragraph list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Section {
    fn heading(level: u8, text: String) -> Self {
        Self {
            kind: SectionType::Heading,
            level: Some(level),
            text,
            items: Vec::new(),
            index: None,
        }
    }

    fn headerless() -> Self {
        Self {
            kind: SectionType::Content,
            level: None,
            text: String::new(),
            items: Vec::new(),
            index: None,
        }
    }

    /// Flat fallback section carrying its paragraph index
    pub fn paragraph(index: usize, text: String) -> Self {
        Self {
            kind: SectionType::Paragraph,
            level: None,
            text,
            items: Vec::new(),
            index: Some(index),
        }
    }

    // * Display text = heading + newline + item texts; headerless sections carry items only
    fn finalize(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let body = self
            .items
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.text = if self.text.is_empty() {
            body
        } else {
            format!("{}\n{}", self.text, body)
        };
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    let mut chars = tag.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('h'), Some(d @ '1'..='6'), None) => d.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// Segments a cleaned container into finalized sections, in document order.
///
/// No length filter is applied here; see [`drop_short_sections`].
pub fn segment(container: ElementRef<'_>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for element in container.select(&SELECTOR_BLOCKS) {
        let text: String = element.text().collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let tag = element.value().name();
        if let Some(level) = heading_level(tag) {
            sections.push(Section::heading(level, text.to_string()));
            continue;
        }

        let item = ContentItem {
            kind: ItemType::from_tag(tag),
            text: text.to_string(),
        };
        match sections.last_mut() {
            Some(open) => open.items.push(item),
            None => {
                let mut open = Section::headerless();
                open.items.push(item);
                sections.push(open);
            }
        }
    }

    for section in &mut sections {
        section.finalize();
    }
    sections
}

/// Drops sections whose finalized text is shorter than the minimum, keeping order
pub fn drop_short_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .filter(|s| char_len(&s.text) >= MIN_SECTION_CHARS)
        .collect()
}
