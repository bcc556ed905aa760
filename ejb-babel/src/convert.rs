//! Batch conversion driver
//!
//!     `convert` reads every input with the source format and writes it with the destination
//!     format. Options, formats and the output directory are checked once, up front; after that a
//!     failing file is recorded in the report and the batch moves on.

use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::registry::FormatRegistry;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConvertSpec {
    pub from: String,
    pub to: String,
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub options: ConvertOptions,
}

impl ConvertSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            options: ConvertOptions::default(),
        }
    }

    /// A package file, or a directory of package files.
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_output_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Converted { artifacts: Vec<PathBuf> },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, Outcome::Failed { .. }))
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter_map(|file| match &file.outcome {
                Outcome::Converted { artifacts } => Some(artifacts),
                Outcome::Failed { .. } => None,
            })
            .flatten()
            .map(PathBuf::as_path)
    }
}

/// Expand directories into their non-hidden regular files, sorted by name.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConvertError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_file() {
            inputs.push(path.clone());
        } else if path.is_dir() {
            let entries = fs::read_dir(path)
                .map_err(|e| ConvertError::io(format!("reading {}", path.display()), e))?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| ConvertError::io(format!("reading {}", path.display()), e))?;
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                let entry_path = entry.path();
                if !hidden && entry_path.is_file() {
                    files.push(entry_path);
                }
            }
            files.sort();
            inputs.extend(files);
        } else {
            return Err(ConvertError::configuration(format!(
                "{} is neither a file nor a directory",
                path.display()
            )));
        }
    }
    Ok(inputs)
}

/// Convert every input. Only configuration problems are returned as errors; per file failures
/// end up in the report.
pub fn convert(registry: &FormatRegistry, spec: &ConvertSpec) -> Result<BatchReport, ConvertError> {
    spec.options.validate()?;
    let reader = registry.reader(&spec.from)?;
    let writer = registry.writer(&spec.to)?;
    if !spec.output_dir.is_dir() {
        return Err(ConvertError::configuration(format!(
            "output directory {} does not exist",
            spec.output_dir.display()
        )));
    }

    let inputs = collect_inputs(&spec.inputs)?;
    if inputs.is_empty() {
        tracing::warn!("no input files");
    }

    let mut report = BatchReport::default();
    for input in inputs {
        tracing::info!("converting {} from {} to {}", input.display(), spec.from, spec.to);
        let result = reader
            .read(&input, &spec.options)
            .and_then(|problem| {
                tracing::debug!(id = problem.id(), "read problem");
                writer.write(&problem, &spec.output_dir, &spec.options)
            });

        let outcome = match result {
            Ok(artifacts) => Outcome::Converted { artifacts },
            Err(err) if err.is_per_file() => {
                tracing::error!("{}: {err}", input.display());
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };
        report.files.push(FileReport { input, outcome });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use ejb::{Evaluation, Limits, Partition, Problem, SolutionSet, StatementBuilder, TestCase, TestSuite};
    use tempfile::tempdir;

    /// Reads any file whose content is "ok", fails on anything else.
    struct StubFormat;

    impl Format for StubFormat {
        fn name(&self) -> &str {
            "stub"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn supports_reading(&self) -> bool {
            true
        }
        fn supports_writing(&self) -> bool {
            true
        }
        fn read(&self, source: &Path, _options: &ConvertOptions) -> Result<Problem, ConvertError> {
            let content = fs::read_to_string(source).map_err(|e| ConvertError::io("stub", e))?;
            if content != "ok" {
                return Err(ConvertError::format("not ok"));
            }
            let statement = StatementBuilder::new("T", "D", "I", "O")
                .example(TestCase::new("1", "1"))
                .build()?;
            let mut tests = TestSuite::new();
            tests.insert(Partition::Examples, "1", TestCase::new("1", "1"));
            let mut set = SolutionSet::new();
            set.insert("c".to_string(), "int main;".to_string());
            let limits = Limits::new(1, 64, None)?;
            Ok(Problem::new("p", statement, Evaluation::new(tests, vec![set], limits)?)?)
        }
        fn write(
            &self,
            problem: &Problem,
            output_dir: &Path,
            _options: &ConvertOptions,
        ) -> Result<Vec<PathBuf>, ConvertError> {
            Ok(vec![output_dir.join(format!("{}.stub", problem.id()))])
        }
    }

    fn registry() -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        registry.register(StubFormat);
        registry
    }

    #[test]
    fn records_failures_and_continues() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.zip"), "ok").unwrap();
        fs::write(dir.path().join("b.zip"), "broken").unwrap();
        fs::write(dir.path().join("c.zip"), "ok").unwrap();
        fs::write(dir.path().join(".hidden"), "broken").unwrap();

        let spec = ConvertSpec::new("stub", "stub")
            .with_input(dir.path())
            .with_output_dir(dir.path());
        let report = convert(&registry(), &spec).unwrap();

        assert_eq!(report.files.len(), 3);
        assert!(!report.all_succeeded());
        let failed: Vec<_> = report.failures().map(|f| f.input.clone()).collect();
        assert_eq!(failed, vec![dir.path().join("b.zip")]);
        assert_eq!(report.artifacts().count(), 2);
    }

    #[test]
    fn rejects_invalid_options_before_reading() {
        let dir = tempdir().unwrap();
        let mut options = ConvertOptions::default();
        options.coderunner.penalty_grace = -1;
        let spec = ConvertSpec::new("stub", "stub")
            .with_input(dir.path())
            .with_output_dir(dir.path())
            .with_options(options);
        assert!(matches!(
            convert(&registry(), &spec),
            Err(ConvertError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_unknown_formats_and_missing_output() {
        let dir = tempdir().unwrap();
        let spec = ConvertSpec::new("nope", "stub").with_output_dir(dir.path());
        assert!(matches!(
            convert(&registry(), &spec),
            Err(ConvertError::FormatNotFound(_))
        ));

        let spec = ConvertSpec::new("stub", "stub").with_output_dir(dir.path().join("missing"));
        assert!(matches!(
            convert(&registry(), &spec),
            Err(ConvertError::Configuration(_))
        ));
    }

    #[test]
    fn missing_input_is_a_configuration_error() {
        let err = collect_inputs(&[PathBuf::from("/no/such/ejb/input")]).unwrap_err();
        assert!(matches!(err, ConvertError::Configuration(_)));
    }

    #[test]
    fn report_serializes_with_status() {
        let report = BatchReport {
            files: vec![FileReport {
                input: PathBuf::from("a.zip"),
                outcome: Outcome::Failed {
                    error: "malformed package: x".to_string(),
                },
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"files":[{"input":"a.zip","status":"failed","error":"malformed package: x"}]}"#
        );
    }
}
