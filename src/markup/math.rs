//! Math delimiters and math span protection

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const ESCAPED_DOLLAR: char = '\u{E002}';
const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static DISPLAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());
static INLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$]+)\$").unwrap());
static SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\\(.*?\\\)|\\\[.*?\\\]").unwrap());
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// Math spans taken out of the text, in order of appearance.
#[derive(Debug, Default)]
pub(super) struct MathSpans(Vec<String>);

impl MathSpans {
    /// Put the spans (and escaped dollars) back.
    pub(super) fn restore(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.0.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .replace(ESCAPED_DOLLAR, "$")
    }
}

/// Rewrite dollar math and replace every math span with a placeholder.
pub(super) fn apply(source: &str) -> (String, MathSpans) {
    let text = source.replace("\\$", &ESCAPED_DOLLAR.to_string());
    let text = DISPLAY.replace_all(&text, |caps: &Captures| format!("\\[ {} \\]", caps[1].trim()));
    let text = INLINE.replace_all(&text, |caps: &Captures| format!("\\( {} \\)", caps[1].trim()));

    let mut spans = Vec::new();
    let text = SPAN.replace_all(&text, |caps: &Captures| {
        spans.push(caps[0].to_string());
        format!("{OPEN}{}{CLOSE}", spans.len() - 1)
    });

    (text.into_owned(), MathSpans(spans))
}
