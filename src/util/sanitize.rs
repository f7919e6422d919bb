use regex::Regex;
use std::sync::LazyLock;

static ANSI_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").expect("valid regex"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*(/?)\s*(p|br)?[^>]*>").expect("valid regex"));

pub const MAX_LABEL_CHARS: usize = 200;

/// Strips ANSI sequences and control characters from upstream text,
/// flattens whitespace to single-line form and caps the length.
pub fn sanitize_for_terminal(s: &str, max_chars: usize) -> String {
    let no_ansi = ANSI_CSI.replace_all(s, "");
    let cleaned: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| *ch >= ' ' && *ch != '\x7f')
        .collect();
    cleaned.trim().chars().take(max_chars).collect()
}

/// Turns the small HTML subset used in profile bios into plain lines.
pub fn html_to_text(html: &str) -> Vec<String> {
    let with_breaks = HTML_TAG.replace_all(html, |caps: &regex::Captures<'_>| {
        if caps.get(2).is_some() { "\n" } else { "" }
    });
    decode_entities(&with_breaks)
        .lines()
        .map(|l| sanitize_for_terminal(l, MAX_LABEL_CHARS))
        .filter(|l| !l.is_empty())
        .collect()
}

fn decode_entities(s: &str) -> String {
    s.replace("&#x2F;", "/")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
