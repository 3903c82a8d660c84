// * Keyword Extraction (fallback when the backend sends no keywords)

use crate::config::constants::MAX_EXTRACTED_KEYWORDS;
use crate::highlight::tokenizer::tokenizers;
use std::collections::HashSet;
use tracing::debug;

/// Derives candidate keywords from free text (usually the key points).
///
/// Every registered tokenizer contributes candidates; the result is
/// de-duplicated (first occurrence wins), ordered longest first and capped.
pub fn extract_keywords<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    let mut candidates = Vec::new();
    for text in texts {
        for tokenizer in tokenizers() {
            tokenizer.extract(text.as_ref(), &mut candidates);
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|k| seen.insert(k.clone()));
    candidates.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    candidates.truncate(MAX_EXTRACTED_KEYWORDS);

    debug!(count = candidates.len(), "extracted fallback keywords");
    candidates
}
