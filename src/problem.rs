//! Canonical problem model
//!
//!     A Problem is the unit of conversion: a stable identifier plus a human facing Statement and
//!     a machine facing Evaluation. Readers build one from a source package, writers render it
//!     into a destination package.
//!
//!     All three types are value objects. Their constructors check the invariants and return a
//!     ValidationError naming the offending field; nothing can be mutated afterwards, so writers
//!     never need to re-check what they receive.

mod evaluation;
mod statement;

pub use evaluation::{Evaluation, Limits, Partition, SolutionSet, TestCase, TestSuite};
pub use statement::{AuxFiles, Statement, StatementBuilder};

use crate::error::ValidationError;

/// A problem package in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    id: String,
    statement: Statement,
    evaluation: Evaluation,
}

impl Problem {
    /// Create a problem. The id names files and directories in every format, so it must be a
    /// single non-blank path component.
    pub fn new(
        id: impl Into<String>,
        statement: Statement,
        evaluation: Evaluation,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        if id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(ValidationError::InvalidId(id));
        }
        Ok(Self {
            id,
            statement,
            evaluation,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement() -> Statement {
        StatementBuilder::new("Sum", "Add two numbers.", "Two integers.", "Their sum.")
            .example(TestCase::new("1 2", "3"))
            .build()
            .unwrap()
    }

    fn evaluation() -> Evaluation {
        let mut tests = TestSuite::new();
        tests.insert(Partition::Examples, "01", TestCase::new("1 2", "3"));
        let solutions = vec![SolutionSet::from([(
            "cpp".to_string(),
            "int main() {}".to_string(),
        )])];
        Evaluation::new(tests, solutions, Limits::new(1, 256, None).unwrap()).unwrap()
    }

    #[test]
    fn test_problem_keeps_its_parts() {
        let problem = Problem::new("sum", statement(), evaluation()).unwrap();
        assert_eq!(problem.id(), "sum");
        assert_eq!(problem.statement(), &statement());
        assert_eq!(problem.evaluation(), &evaluation());
    }

    #[test]
    fn test_problem_rejects_blank_id() {
        let err = Problem::new("  ", statement(), evaluation()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("id"));
    }

    #[test]
    fn test_problem_rejects_id_with_path_separators() {
        for id in ["../evil", "a/b", "a\\b", ".."] {
            let err = Problem::new(id, statement(), evaluation()).unwrap_err();
            assert_eq!(err, ValidationError::InvalidId(id.to_string()));
        }
    }
}
