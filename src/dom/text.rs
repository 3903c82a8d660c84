// * Text measurement helpers shared by extraction, scoring and presentation

use unicode_segmentation::UnicodeSegmentation;

/// Length in characters (Unicode scalar values)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First `n` grapheme clusters of `text`
pub fn prefix(text: &str, n: usize) -> &str {
    match text.grapheme_indices(true).nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Short single-line preview, ellipsized when truncated
pub fn preview(text: &str, n: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let head = prefix(&collapsed, n);
    if head.len() < collapsed.len() {
        format!("{head}…")
    } else {
        collapsed
    }
}

/// Whitespace-separated token count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_respects_graphemes() {
        assert_eq!(prefix("Enterprise plan", 10), "Enterprise");
        assert_eq!(prefix("短文本", 10), "短文本");
        assert_eq!(prefix("数据分析平台", 2), "数据");
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("a\n  b   c", 20), "a b c");
        assert_eq!(preview("abcdef", 3), "abc…");
    }

    #[test]
    fn test_counts() {
        assert_eq!(char_len("数据 ab"), 5);
        assert_eq!(word_count(" one two\nthree "), 3);
    }
}
