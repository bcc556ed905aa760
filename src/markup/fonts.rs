//! Font commands

use once_cell::sync::Lazy;
use regex::Regex;

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(textbf|textit|texttt|textrm|emph|bf|it|tt|t)\{").unwrap());

fn tag_for(command: &str) -> Option<&'static str> {
    match command {
        "textbf" | "bf" => Some("b"),
        "textit" | "emph" | "it" => Some("i"),
        "texttt" | "tt" | "t" => Some("tt"),
        _ => None,
    }
}

/// Wrap each font command argument in its HTML tag. Arguments are matched by brace depth, so
/// nested commands work; an unbalanced command is left untouched.
pub(super) fn apply(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(caps) = COMMAND.captures(rest) {
        let (Some(whole), Some(command)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        out.push_str(&rest[..whole.start()]);
        let body = &rest[whole.end()..];

        match closing_brace(body) {
            Some(end) => {
                let inner = apply(&body[..end]);
                match tag_for(command.as_str()) {
                    Some(tag) if !inner.is_empty() => {
                        out.push_str(&format!("<{tag}>{inner}</{tag}>"))
                    }
                    _ => out.push_str(&inner),
                }
                rest = &body[end + 1..];
            }
            None => {
                out.push_str(whole.as_str());
                rest = body;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the `}` closing an already opened brace.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
