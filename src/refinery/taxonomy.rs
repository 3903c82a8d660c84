// * Noise Taxonomy & Content Region Selectors
// * Every fixed selector list used by extraction, scoring and highlighting lives here.

use scraper::Selector;
use std::sync::LazyLock;

fn compile_each(list: &[&str]) -> Vec<Selector> {
    list.iter()
        .map(|css| Selector::parse(css).expect("valid taxonomy selector"))
        .collect()
}

fn compile_group(list: &[&str]) -> Selector {
    Selector::parse(&list.join(", ")).expect("valid taxonomy selector group")
}

// * Semantic landmarks, tried first by the container locator
pub const LANDMARKS: &[&str] = &[
    "article",
    "main",
    r#"[role="main"]"#,
    ".main-content",
    "#main-content",
];

// * Conventional content classes, tried after the landmarks
pub const CONTENT_CLASSES: &[&str] = &[
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".post-body",
    ".article-body",
    ".content-body",
    ".main-article",
    ".story-body",
    ".article-text",
    ".post-text",
];

// * Noise descendants checked proportionally during container validation
pub const CONTAINER_NOISE: &[&str] = &[
    ".nav",
    ".navbar",
    ".navigation",
    ".menu",
    ".sidebar",
    ".aside",
    ".widget",
    ".advertisement",
    ".ad",
    ".ads",
    ".comment",
    ".comments",
    ".social",
];

// * Removed unconditionally from the detached container clone
pub const FILTER_NOISE: &[&str] = &[
    "nav",
    ".nav",
    ".navbar",
    ".navigation",
    ".menu",
    ".sidebar",
    ".aside",
    ".widget",
    ".widgets",
    ".advertisement",
    ".ad",
    ".ads",
    ".banner",
    ".comment",
    ".comments",
    ".social",
    ".share",
    "footer",
    ".footer",
    ".copyright",
    ".related",
    ".recommended",
    ".trending",
    "script",
    "style",
    "noscript",
];

// * Ancestors that disqualify a paragraph in fallback extraction
pub const FALLBACK_NOISE: &[&str] = &[
    "nav",
    ".nav",
    ".navbar",
    ".menu",
    "header",
    ".header",
    "footer",
    ".footer",
    ".sidebar",
    ".aside",
    ".advertisement",
    ".ad",
];

// * Preferred text regions for scoring and highlighting (first selector with a match wins)
pub const TEXT_REGIONS: &[&str] = &[
    "article",
    "main",
    r#"[role="main"]"#,
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".post-body",
    ".content-body",
];

// * Global fallback when no text region exists
pub const TEXT_FALLBACK: &str = "p, h1, h2, h3, h4, h5, h6, li";

// * Always excluded from scoring and highlighting, on the element or any ancestor
pub const TEXT_EXCLUDE: &[&str] = &[
    "nav",
    "header",
    "footer",
    ".nav",
    ".navbar",
    ".header",
    ".footer",
    ".sidebar",
    ".menu",
    ".advertisement",
    ".ad",
    ".comment",
    ".comments",
];

// * Class/id names owned by the presentation layer
pub const CLASS_MARKER: &str = "tldr-highlight";
pub const CLASS_PANEL: &str = "tldr-panel";
pub const CLASS_SIDEBAR: &str = "tldr-sidebar";
pub const CLASS_TOOLTIP: &str = "tldr-keyword-tooltip";
pub const ID_FLOATING_PANEL: &str = "tldr-floating-panel";
pub const ID_SIDEBAR: &str = "tldr-sidebar";
pub const ID_SIDEBAR_CONTENT: &str = "tldr-sidebar-content";

// * The presentation layer's own subtrees; never scored, never highlighted
pub const PROJECTOR_SUBTREES: &[&str] = &[".tldr-panel", ".tldr-sidebar", ".tldr-keyword-tooltip"];

pub static LANDMARK_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| compile_each(LANDMARKS));
pub static CONTENT_CLASS_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile_each(CONTENT_CLASSES));
pub static CONTAINER_NOISE_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile_each(CONTAINER_NOISE));
pub static FILTER_NOISE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_group(FILTER_NOISE));
pub static FALLBACK_NOISE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_group(FALLBACK_NOISE));
pub static TEXT_REGION_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile_each(TEXT_REGIONS));
pub static TEXT_FALLBACK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TEXT_FALLBACK).expect("valid text fallback selector"));
pub static TEXT_EXCLUDE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_group(TEXT_EXCLUDE));
pub static PROJECTOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_group(PROJECTOR_SUBTREES));
pub static MARKER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(".{CLASS_MARKER}")).expect("valid marker selector")
});
