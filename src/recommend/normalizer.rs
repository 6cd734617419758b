use regex::Regex;
use std::sync::LazyLock;

// Boilerplate phrasing that LLM summaries repeat for every unit.
static FILLERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bin (the)?[\w\s]+ system\b",
        r"(?i)\b(in|within) an? [\w\s]+ platform\b",
        r"(?i)\bmethod\b",
        r"(?i)\bclass\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("filler pattern is valid"))
    .collect()
});

/// Strips filler phrases from a summary and collapses whitespace.
///
/// Stripping repeats until nothing changes, so `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut current = collapse_whitespace(text);
    loop {
        let next = strip_fillers(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_fillers(text: &str) -> String {
    let mut stripped = text.to_string();
    for filler in FILLERS.iter() {
        stripped = filler.replace_all(&stripped, "").into_owned();
    }
    collapse_whitespace(&stripped)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
