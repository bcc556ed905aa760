//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available package formats.
//! Formats can be registered and retrieved by name.

use crate::error::ConvertError;
use crate::format::Format;
use crate::options::ConvertOptions;
use ejb::Problem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Registry of package formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let problem = registry.read(Path::new("sum.zip"), "polygon", &options)?;
/// let artifacts = registry.write(&problem, Path::new("out"), "boca", &options)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, ConvertError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ConvertError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// A format that can read packages
    pub fn reader(&self, name: &str) -> Result<&dyn Format, ConvertError> {
        let fmt = self.get(name)?;
        if !fmt.supports_reading() {
            return Err(ConvertError::NotSupported(format!(
                "Format '{}' does not support reading",
                name
            )));
        }
        Ok(fmt)
    }

    /// A format that can write packages
    pub fn writer(&self, name: &str) -> Result<&dyn Format, ConvertError> {
        let fmt = self.get(name)?;
        if !fmt.supports_writing() {
            return Err(ConvertError::NotSupported(format!(
                "Format '{}' does not support writing",
                name
            )));
        }
        Ok(fmt)
    }

    /// Read a package using the specified format
    pub fn read(
        &self,
        source: &Path,
        format: &str,
        options: &ConvertOptions,
    ) -> Result<Problem, ConvertError> {
        self.reader(format)?.read(source, options)
    }

    /// Write a problem using the specified format
    pub fn write(
        &self,
        problem: &Problem,
        output_dir: &Path,
        format: &str,
        options: &ConvertOptions,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        self.writer(format)?.write(problem, output_dir, options)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formats
        registry.register(crate::formats::boca::BocaFormat::default());
        registry.register(crate::formats::polygon::PolygonFormat);
        registry.register(crate::formats::coderunner::CodeRunnerFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
