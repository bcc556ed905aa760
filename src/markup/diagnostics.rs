//! Residual command scan

use super::MarkupWarning;
use once_cell::sync::Lazy;
use regex::Regex;

static COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[A-Za-z]+").unwrap());

/// Math spans are placeholders by now, so only text outside math is scanned.
pub(super) fn scan(text: &str, warnings: &mut Vec<MarkupWarning>) {
    warnings.extend(
        COMMAND
            .find_iter(text)
            .map(|m| MarkupWarning::UnsupportedCommand(m.as_str().to_string())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_warning_per_occurrence() {
        let mut warnings = Vec::new();
        scan("\\hline a \\hline \\\\ b \\vspace{1em}", &mut warnings);
        assert_eq!(
            warnings,
            vec![
                MarkupWarning::UnsupportedCommand("\\hline".to_string()),
                MarkupWarning::UnsupportedCommand("\\hline".to_string()),
                MarkupWarning::UnsupportedCommand("\\vspace".to_string()),
            ]
        );
    }
}
