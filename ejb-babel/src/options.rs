//! Per-format conversion options
//!
//!     Every format owns one closed group of options. The groups deserialize straight from the
//!     `[convert]` table of the configuration file (see ejb-config), and fall back to the values
//!     below for anything left unset.

use crate::error::ConvertError;
use crate::formats::coderunner;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub polygon: PolygonOptions,
    pub boca: BocaOptions,
    pub coderunner: CodeRunnerOptions,
}

impl ConvertOptions {
    /// Reject option values no conversion could succeed with.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.polygon.statement_language.trim().is_empty() {
            return Err(ConvertError::configuration(
                "polygon.statement_language must not be empty",
            ));
        }
        if self.polygon.max_file_size_kb == 0 {
            return Err(ConvertError::configuration(
                "polygon.max_file_size_kb must be positive",
            ));
        }

        let limits = &self.boca.default_limits;
        if limits.time_seconds == 0 || limits.memory_mb == 0 || limits.max_file_size_kb == 0 {
            return Err(ConvertError::configuration(
                "boca.default_limits values must be positive",
            ));
        }
        if self.boca.pdf_compiler.trim().is_empty() {
            return Err(ConvertError::configuration(
                "boca.pdf_compiler must name a program",
            ));
        }

        let coderunner = &self.coderunner;
        if coderunner.penalty_grace < 0 {
            return Err(ConvertError::configuration(format!(
                "coderunner.penalty_grace {} cannot be negative",
                coderunner.penalty_grace
            )));
        }
        let language = coderunner.answer_language.as_str();
        if language != "all" && coderunner::prototype_for(language).is_none() {
            return Err(ConvertError::configuration(format!(
                "unsupported coderunner.answer_language '{}' (expected all, {})",
                language,
                coderunner::LANGUAGES.join(", ")
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonOptions {
    /// Directory under `statement-sections/` to read.
    pub statement_language: String,
    /// Polygon has no output size limit; this one is used instead.
    pub max_file_size_kb: u64,
    /// Pair test files with `<test>` elements by sorted position instead of by number.
    pub positional_test_matching: bool,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self {
            statement_language: "english".to_string(),
            max_file_size_kb: 64,
            positional_test_matching: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BocaOptions {
    /// Parent of the scratch directory used to build the statement PDF.
    pub tmp_dir: Option<PathBuf>,
    pub include_notes: bool,
    pub include_tutorial: bool,
    pub pdf_compiler: String,
    /// Extra directories (compile/, run/, compare/, ...) copied into every package.
    pub template_dir: Option<PathBuf>,
    /// Used when a package carries no readable limits script.
    pub default_limits: DefaultLimits,
}

impl Default for BocaOptions {
    fn default() -> Self {
        Self {
            tmp_dir: None,
            include_notes: false,
            include_tutorial: false,
            pdf_compiler: "pdflatex".to_string(),
            template_dir: None,
            default_limits: DefaultLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultLimits {
    pub time_seconds: u64,
    pub memory_mb: u64,
    pub max_file_size_kb: u64,
}

impl Default for DefaultLimits {
    fn default() -> Self {
        Self {
            time_seconds: 1,
            memory_mb: 512,
            max_file_size_kb: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeRunnerOptions {
    /// Wrong attempts allowed before the 10% penalty steps start.
    pub penalty_grace: i64,
    pub all_or_nothing: bool,
    /// `all`, or one of the supported answer languages.
    pub answer_language: String,
    pub include_notes: bool,
    /// Program used to rasterize vector images (ImageMagick `convert`, for instance).
    pub image_converter: Option<String>,
    pub headings: Headings,
}

impl Default for CodeRunnerOptions {
    fn default() -> Self {
        Self {
            penalty_grace: 2,
            all_or_nothing: false,
            answer_language: "all".to_string(),
            include_notes: true,
            image_converter: None,
            headings: Headings::default(),
        }
    }
}

/// Section headings of the question text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub input: String,
    pub output: String,
    pub notes: String,
}

impl Default for Headings {
    fn default() -> Self {
        Self {
            input: "Entrada".to_string(),
            output: "Saída".to_string(),
            notes: "Observações".to_string(),
        }
    }
}
