use std::sync::LazyLock;

use regex::Regex;

static TRAILING_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\[\]]*\]\s*$").unwrap());
static QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"`]"#).unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Drops a trailing `[...]` qualifier such as an episode range or `[TV]`.
pub fn strip_qualifier(title: &str) -> &str {
    match TRAILING_QUALIFIER.find(title) {
        Some(m) => &title[..m.start()],
        None => title.trim_end(),
    }
}

/// Lowercase, dash-separated directory name. Letters of any script are kept.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let unquoted = QUOTES.replace_all(&lowered, "");
    SEPARATORS
        .replace_all(&unquoted, "-")
        .trim_matches('-')
        .to_string()
}

pub fn title_slug(title: &str) -> String {
    slugify(strip_qualifier(title))
}
