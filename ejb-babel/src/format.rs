//! Format trait definition
//!
//! This module defines the core Format trait that every package format implements. A format
//! can read packages into the canonical Problem, write a Problem out as packages, or both.

use crate::error::ConvertError;
use crate::options::ConvertOptions;
use ejb::Problem;
use std::path::{Path, PathBuf};

/// Trait for e-judge package formats
///
/// # Examples
///
/// ```ignore
/// struct MyJudge;
///
/// impl Format for MyJudge {
///     fn name(&self) -> &str {
///         "my-judge"
///     }
///
///     fn supports_reading(&self) -> bool {
///         true
///     }
///
///     fn read(&self, source: &Path, options: &ConvertOptions) -> Result<Problem, ConvertError> {
///         let archive = Archive::open(source)?;
///         MyJudgeReader::new(&archive).assemble()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "boca", "polygon")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Extensions of the files this format reads or writes
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format can read packages (package → Problem)
    fn supports_reading(&self) -> bool {
        false
    }

    /// Whether this format can write packages (Problem → package)
    fn supports_writing(&self) -> bool {
        false
    }

    /// Read one source package
    ///
    /// Default implementation returns NotSupported error.
    fn read(&self, _source: &Path, _options: &ConvertOptions) -> Result<Problem, ConvertError> {
        Err(ConvertError::NotSupported(format!(
            "Format '{}' does not support reading",
            self.name()
        )))
    }

    /// Write a problem into `output_dir` and return the paths of the artifacts created
    ///
    /// Default implementation returns NotSupported error.
    fn write(
        &self,
        _problem: &Problem,
        _output_dir: &Path,
        _options: &ConvertOptions,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        Err(ConvertError::NotSupported(format!(
            "Format '{}' does not support writing",
            self.name()
        )))
    }
}
