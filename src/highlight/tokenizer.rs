// * Script-aware tokenization behind one seam.
// * Each tokenizer knows how to match a keyword of its script and how to pull
// * candidate keywords out of free text. Adding a script means adding a tokenizer.

use crate::highlight::stopwords::is_stop_word;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static LATIN_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid latin keyword regex"));
static LATIN_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z]+(?:\s+[a-zA-Z]+){0,2}").expect("valid latin phrase regex")
});
static CJK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[一-龥]{2,}").expect("valid cjk run regex"));

/// Script-specific keyword matching and extraction
pub trait Tokenizer: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// True when this tokenizer owns matching for the keyword
    fn accepts(&self, keyword: &str) -> bool;

    /// Regex source matching an already escaped keyword
    fn pattern(&self, escaped: &str) -> String;

    /// Appends candidate keywords found in `text` to `out`
    fn extract(&self, text: &str, out: &mut Vec<String>);
}

/// Space-delimited Latin script: word-boundary anchored, 1-3 word phrases
pub struct LatinTokenizer;

impl Tokenizer for LatinTokenizer {
    fn name(&self) -> &'static str {
        "latin"
    }

    fn accepts(&self, keyword: &str) -> bool {
        LATIN_KEYWORD.is_match(keyword)
    }

    fn pattern(&self, escaped: &str) -> String {
        format!(r"\b(?:{escaped})\b")
    }

    fn extract(&self, text: &str, out: &mut Vec<String>) {
        for phrase in LATIN_PHRASE.find_iter(text) {
            let phrase = phrase.as_str().trim();
            let words: Vec<&str> = phrase.split_whitespace().collect();

            let keep = match words.as_slice() {
                [word] => word.chars().count() >= 3 && !is_stop_word(word),
                _ => !words.iter().any(|w| is_stop_word(w)) && phrase.chars().count() >= 4,
            };
            if keep {
                out.push(phrase.to_string());
            }
        }
    }
}

/// Unspaced CJK script (and any mixed or punctuated keyword): no boundaries
pub struct CjkTokenizer;

impl Tokenizer for CjkTokenizer {
    fn name(&self) -> &'static str {
        "cjk"
    }

    fn accepts(&self, _keyword: &str) -> bool {
        true
    }

    fn pattern(&self, escaped: &str) -> String {
        escaped.to_string()
    }

    fn extract(&self, text: &str, out: &mut Vec<String>) {
        for run in CJK_RUN.find_iter(text) {
            if !is_stop_word(run.as_str()) {
                out.push(run.as_str().to_string());
            }
        }
    }
}

// * Order matters: the catch-all CJK tokenizer must stay last
static TOKENIZERS: &[&dyn Tokenizer] = &[&LatinTokenizer, &CjkTokenizer];

/// Registered tokenizers in matching priority
pub fn tokenizers() -> &'static [&'static dyn Tokenizer] {
    TOKENIZERS
}

/// The tokenizer responsible for matching `keyword`
pub fn tokenizer_for(keyword: &str) -> &'static dyn Tokenizer {
    TOKENIZERS
        .iter()
        .copied()
        .find(|t| t.accepts(keyword))
        .unwrap_or(&CjkTokenizer)
}

/// A compiled, case-insensitive keyword matcher
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    pub keyword: String,
    pub regex: Regex,
}

/// Compiles one keyword with its script's boundary rules; `None` for blank keywords
pub fn compile_keyword(keyword: &str) -> Option<KeywordPattern> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }

    let source = tokenizer_for(keyword).pattern(&regex::escape(keyword));
    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .ok()?;

    Some(KeywordPattern {
        keyword: keyword.to_string(),
        regex,
    })
}
