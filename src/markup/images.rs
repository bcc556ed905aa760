//! \includegraphics to <img>

use super::{ImageIndex, MarkupWarning};
use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static INCLUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\includegraphics\s*(?:\[([^\]]*)\])?\s*\{([^}]*)\}").unwrap()
});
static SCALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"scale\s*=\s*([0-9]*\.?[0-9]+)").unwrap());
static WIDTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"width\s*=\s*([0-9]*\.?[0-9]+)\s*\\(?:text|line)width").unwrap()
});

pub(super) fn apply(
    text: &str,
    images: &ImageIndex,
    prefix: &str,
    warnings: &mut Vec<MarkupWarning>,
) -> Result<String, ValidationError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in INCLUDE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().trim();
        let file = images.resolve(name)?;

        out.push_str(&text[last..whole.start()]);
        out.push_str(&format!("<img src=\"{prefix}{file}\""));
        if let Some(options) = caps.get(1).map(|m| m.as_str().trim()) {
            match width_percent(options) {
                Some(width) => out.push_str(&format!(" width=\"{width}%\"")),
                None if !options.is_empty() => warnings.push(MarkupWarning::UnknownImageOptions {
                    image: name.to_string(),
                    options: options.to_string(),
                }),
                None => {}
            }
        }
        out.push('>');
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// `scale=f` or `width=f\textwidth`, as a truncated percentage.
fn width_percent(options: &str) -> Option<u32> {
    let options = options.to_lowercase();
    let factor = SCALE
        .captures(&options)
        .or_else(|| WIDTH.captures(&options))?
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()?;
    Some((factor * 100.0) as u32)
}
