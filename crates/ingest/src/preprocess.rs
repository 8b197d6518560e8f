use regex::Regex;
use std::sync::LazyLock;

/// Sentence punctuation, ASCII and full-width, that separates clauses.
static SENTENCE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[。，、；：！？…“”‘’「」『』（）《》【】〈〉～·,.;:!?"'()\[\]<>~]"#)
        .expect("punctuation pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize raw text for pattern matching.
///
/// Punctuation becomes a space, whitespace runs collapse to a single space and
/// the result is trimmed. Applying it twice gives the same result as once.
pub fn preprocess(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let spaced = SENTENCE_PUNCTUATION.replace_all(text, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");

    collapsed.trim().to_string()
}

/// Length in characters, which is what offsets and position ratios use.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a byte offset into `text` to a character offset.
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
