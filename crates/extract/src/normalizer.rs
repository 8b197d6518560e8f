use regex::Regex;
use std::sync::LazyLock;

static NAME_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.,!?;:'"。，、；：！？“”‘’（）()《》·]"#).expect("name punctuation pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize a participant name for id construction: lowercase, trim, strip
/// punctuation and join inner whitespace runs with `-`.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();

    let stripped = NAME_PUNCTUATION.replace_all(lowered.trim(), "");
    let joined = WHITESPACE_RUN.replace_all(stripped.trim(), "-");

    joined.to_string()
}
