// * Page Title & Byline Metadata
// * Extraction chain per field: article-specific markup -> generic markup -> document fallback

use crate::dom;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SELECTOR_ARTICLE_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article h1, .article-title, .post-title, .entry-title")
        .expect("valid article title selector")
});
static SELECTOR_H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static SELECTOR_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

// * Author sources, in priority order
static AUTHOR_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        ".author",
        ".by-author",
        ".post-author",
        r#"[rel="author"]"#,
        ".byline",
        ".article-author",
        r#"meta[name="author"]"#,
    ]
    .iter()
    .map(|css| Selector::parse(css).expect("valid author selector"))
    .collect()
});

// * Publish date sources, in priority order
static DATE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "time[datetime]",
        ".publish-date",
        ".post-date",
        ".article-date",
        ".date",
        "[data-timestamp]",
        r#"meta[property="article:published_time"]"#,
    ]
    .iter()
    .map(|css| Selector::parse(css).expect("valid date selector"))
    .collect()
});

/// Byline metadata sent alongside the extracted content
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Page title: article heading, then the first `<h1>`, then `<title>`
pub fn extract_title(document: &Html) -> String {
    let from = |selector: &Selector| {
        dom::select_attached(document, selector)
            .next()
            .map(trimmed_text)
            .filter(|t| !t.is_empty())
    };

    from(&SELECTOR_ARTICLE_TITLE)
        .or_else(|| from(&SELECTOR_H1))
        .or_else(|| from(&SELECTOR_TITLE))
        .unwrap_or_default()
}

/// Author and publish date; the first matching selector of each chain wins
pub fn extract_metadata(document: &Html) -> PageMetadata {
    let author = AUTHOR_SELECTORS
        .iter()
        .find_map(|s| dom::select_attached(document, s).next())
        .map(|e| {
            e.value()
                .attr("content")
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| trimmed_text(e))
        });

    let publish_date = DATE_SELECTORS
        .iter()
        .find_map(|s| dom::select_attached(document, s).next())
        .map(|e| {
            e.value()
                .attr("datetime")
                .or_else(|| e.value().attr("content"))
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| trimmed_text(e))
        });

    PageMetadata {
        author,
        publish_date,
    }
}
