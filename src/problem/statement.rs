//! Statement: the human facing description of a problem

use super::evaluation::TestCase;
use crate::error::ValidationError;
use std::collections::BTreeMap;

/// Statement assets (images and friends), keyed by file name.
pub type AuxFiles = BTreeMap<String, Vec<u8>>;

/// Title, body sections, examples and assets of a problem.
///
/// Body text is kept in the source markup dialect; destinations that need HTML run it through
/// the [`Translator`](crate::markup::Translator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    title: String,
    description: String,
    input_spec: String,
    output_spec: String,
    examples: Vec<TestCase>,
    aux_files: AuxFiles,
    tags: Vec<String>,
    tutorial: Option<String>,
    notes: Option<String>,
}

impl Statement {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_spec(&self) -> &str {
        &self.input_spec
    }

    pub fn output_spec(&self) -> &str {
        &self.output_spec
    }

    pub fn examples(&self) -> &[TestCase] {
        &self.examples
    }

    pub fn aux_files(&self) -> &AuxFiles {
        &self.aux_files
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tutorial(&self) -> Option<&str> {
        self.tutorial.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Collects the parts of a [`Statement`] and validates them in [`build`](Self::build).
///
/// Every builder owns fresh containers, nothing is shared between statements.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    title: String,
    description: String,
    input_spec: String,
    output_spec: String,
    examples: Vec<TestCase>,
    aux_files: AuxFiles,
    tags: Vec<String>,
    tutorial: Option<String>,
    notes: Option<String>,
}

impl StatementBuilder {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        input_spec: impl Into<String>,
        output_spec: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            input_spec: input_spec.into(),
            output_spec: output_spec.into(),
            ..Self::default()
        }
    }

    pub fn example(mut self, example: TestCase) -> Self {
        self.examples.push(example);
        self
    }

    pub fn examples(mut self, examples: impl IntoIterator<Item = TestCase>) -> Self {
        self.examples.extend(examples);
        self
    }

    pub fn aux_file(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.aux_files.insert(name.into(), data.into());
        self
    }

    pub fn aux_files(mut self, files: AuxFiles) -> Self {
        self.aux_files.extend(files);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn tutorial(mut self, tutorial: Option<String>) -> Self {
        self.tutorial = tutorial;
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Validate and freeze the statement.
    ///
    /// Blank tutorial/notes collapse to `None`, blank and repeated tags are dropped (first
    /// occurrence wins, so output stays deterministic).
    pub fn build(self) -> Result<Statement, ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("input", &self.input_spec)?;
        require("output", &self.output_spec)?;

        if self.examples.is_empty() {
            return Err(ValidationError::NoExamples);
        }
        for (index, example) in self.examples.iter().enumerate() {
            if example.input().trim().is_empty() {
                return Err(ValidationError::EmptyExample {
                    index,
                    side: "input",
                });
            }
            if example.output().trim().is_empty() {
                return Err(ValidationError::EmptyExample {
                    index,
                    side: "output",
                });
            }
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(Statement {
            title: self.title,
            description: self.description,
            input_spec: self.input_spec,
            output_spec: self.output_spec,
            examples: self.examples,
            aux_files: self.aux_files,
            tags,
            tutorial: non_blank(self.tutorial),
            notes: non_blank(self.notes),
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
