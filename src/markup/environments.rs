//! Lists and centering

use once_cell::sync::Lazy;
use regex::Regex;

static END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\end\s*\{(itemize|enumerate|center)\}").unwrap());

const ITEM: &str = "\\item";

pub(super) fn apply(text: &str) -> String {
    blocks(&items(text))
}

/// `\item` runs up to the next backslash (or the end of the text).
fn items(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(ITEM) {
        let after = &rest[start + ITEM.len()..];
        if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
            // \itemsep and the like
            out.push_str(&rest[..start + ITEM.len()]);
            rest = after;
            continue;
        }
        out.push_str(&rest[..start]);
        let end = after.find('\\').unwrap_or(after.len());
        out.push_str(&format!("<li>{}</li>\n", after[..end].trim()));
        rest = &after[end..];
    }

    out.push_str(rest);
    out
}

/// Environments are replaced innermost first, so nested lists come out nested.
fn blocks(text: &str) -> String {
    let mut text = text.to_string();
    let mut from = 0;

    while let Some(caps) = END.captures_at(&text, from) {
        let (Some(end), Some(env)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let (end_start, end_stop) = (end.start(), end.end());
        let env = env.as_str().to_string();
        let open = format!("\\begin{{{env}}}");

        match text[..end_start].rfind(&open) {
            Some(begin) => {
                let inner = text[begin + open.len()..end_start].trim().to_string();
                let html = match env.as_str() {
                    "itemize" => format!("<ul>\n{inner}\n</ul>"),
                    "enumerate" => format!("<ol>\n{inner}\n</ol>"),
                    _ => format!("<p style=\"text-align: center;\">{inner}</p>"),
                };
                text.replace_range(begin..end_stop, &html);
                from = begin;
            }
            None => from = end_stop,
        }
    }

    text
}
