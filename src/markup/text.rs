//! Quotes and paragraphs

use once_cell::sync::Lazy;
use regex::Regex;

static DOUBLE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"``(.*?)''").unwrap());
static SINGLE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)'").unwrap());
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)*").unwrap());

pub(super) fn apply(text: &str) -> String {
    let text = DOUBLE_QUOTES.replace_all(text, "\"$1\"");
    let text = SINGLE_QUOTES.replace_all(&text, "'$1'");
    BLANK_LINES.replace_all(&text, "\n</p><p>\n").into_owned()
}
