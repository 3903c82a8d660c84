// * Bilingual (English / Chinese) stop words for keyword extraction

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH: &[&str] = &[
    "the", "is", "at", "which", "on", "and", "or", "but", "in", "with", "for", "to", "of", "a",
    "an", "as", "are", "was", "were", "been", "be", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "must", "can", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
    "your", "his", "our", "their", "what", "who", "when", "where", "why", "how", "all", "any",
    "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very",
];

const CHINESE: &[&str] = &[
    "的", "了", "在", "有", "是", "与", "或", "但是", "可以", "能够", "一个", "这个", "那个",
    "我们", "你们", "他们", "这里", "那里", "因为", "所以", "然后", "而且",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().chain(CHINESE.iter()).copied().collect());

/// Case-insensitive stop word lookup
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(is_stop_word("The"));
        assert!(is_stop_word("with"));
        assert!(is_stop_word("我们"));
        assert!(!is_stop_word("Enterprise"));
        assert!(!is_stop_word("数据"));
    }
}
