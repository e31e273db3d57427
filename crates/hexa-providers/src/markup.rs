//! Normalization of the markdown emphasis returned by the generation model.

use regex::Regex;
use std::sync::LazyLock;

static BOLD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.+?):\*\*").expect("bold label pattern is valid")
});

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

/// Converts `**bold**` spans into `<strong>` tags and drops every asterisk
/// that is left over afterwards, including unmatched `**` halves such as
/// `Bias:**` or `**Text`. The result is trimmed.
pub fn normalize_markup(text: &str) -> String {
    let text = BOLD_LABEL.replace_all(text, "<strong>$1:</strong>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    text.replace('*', "").trim().to_string()
}
