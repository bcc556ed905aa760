//! Evaluation: tests, reference solutions and limits

use crate::error::ValidationError;
use std::collections::BTreeMap;

/// One input/expected output pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCase {
    input: String,
    output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// The two named test partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Shown to the solver as part of the statement.
    Examples,
    /// Used for grading only.
    Hidden,
}

impl Partition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Examples => "examples",
            Partition::Hidden => "hidden",
        }
    }
}

/// Test cases keyed by a stable identifier, split into examples and hidden tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuite {
    examples: BTreeMap<String, TestCase>,
    hidden: BTreeMap<String, TestCase>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test, replacing any earlier test with the same id in that partition.
    pub fn insert(&mut self, partition: Partition, id: impl Into<String>, test: TestCase) {
        self.partition_mut(partition).insert(id.into(), test);
    }

    pub fn partition(&self, partition: Partition) -> &BTreeMap<String, TestCase> {
        match partition {
            Partition::Examples => &self.examples,
            Partition::Hidden => &self.hidden,
        }
    }

    fn partition_mut(&mut self, partition: Partition) -> &mut BTreeMap<String, TestCase> {
        match partition {
            Partition::Examples => &mut self.examples,
            Partition::Hidden => &mut self.hidden,
        }
    }

    pub fn examples(&self) -> &BTreeMap<String, TestCase> {
        &self.examples
    }

    pub fn hidden(&self) -> &BTreeMap<String, TestCase> {
        &self.hidden
    }

    pub fn len(&self) -> usize {
        self.examples.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty() && self.hidden.is_empty()
    }

    /// All tests, examples first, each partition in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Partition, &str, &TestCase)> {
        let examples = self
            .examples
            .iter()
            .map(|(id, t)| (Partition::Examples, id.as_str(), t));
        let hidden = self
            .hidden
            .iter()
            .map(|(id, t)| (Partition::Hidden, id.as_str(), t));
        examples.chain(hidden)
    }
}

/// Source code per language tag (`c`, `cpp`, `py`, `java`, ...).
pub type SolutionSet = BTreeMap<String, String>;

/// Resource limits. Every value is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    time_seconds: u64,
    memory_mb: u64,
    max_file_size_kb: Option<u64>,
}

impl Limits {
    pub fn new(
        time_seconds: u64,
        memory_mb: u64,
        max_file_size_kb: Option<u64>,
    ) -> Result<Self, ValidationError> {
        if time_seconds == 0 {
            return Err(ValidationError::NonPositiveLimit("time_seconds"));
        }
        if memory_mb == 0 {
            return Err(ValidationError::NonPositiveLimit("memory_mb"));
        }
        if max_file_size_kb == Some(0) {
            return Err(ValidationError::NonPositiveLimit("max_file_size_kb"));
        }
        Ok(Self {
            time_seconds,
            memory_mb,
            max_file_size_kb,
        })
    }

    pub fn time_seconds(&self) -> u64 {
        self.time_seconds
    }

    pub fn memory_mb(&self) -> u64 {
        self.memory_mb
    }

    pub fn max_file_size_kb(&self) -> Option<u64> {
        self.max_file_size_kb
    }
}

/// Machine facing grading information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    tests: TestSuite,
    solutions: Vec<SolutionSet>,
    limits: Limits,
}

impl Evaluation {
    /// `solutions` is in preference order, e.g. the main solution before accepted ones.
    pub fn new(
        tests: TestSuite,
        solutions: Vec<SolutionSet>,
        limits: Limits,
    ) -> Result<Self, ValidationError> {
        if tests.is_empty() {
            return Err(ValidationError::NoTests);
        }
        if solutions.iter().all(|set| set.is_empty()) {
            return Err(ValidationError::NoSolutions);
        }
        Ok(Self {
            tests,
            solutions,
            limits,
        })
    }

    pub fn tests(&self) -> &TestSuite {
        &self.tests
    }

    pub fn solutions(&self) -> &[SolutionSet] {
        &self.solutions
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Source of the most preferred solution written in `language`.
    pub fn solution_for(&self, language: &str) -> Option<&str> {
        self.solutions
            .iter()
            .find_map(|set| set.get(language))
            .map(String::as_str)
    }

    /// Every language some solution set provides, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .solutions
            .iter()
            .flat_map(|set| set.keys().map(String::as_str))
            .collect();
        languages.sort_unstable();
        languages.dedup();
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite() -> TestSuite {
        let mut tests = TestSuite::new();
        tests.insert(Partition::Hidden, "02", TestCase::new("5 5", "10"));
        tests.insert(Partition::Examples, "01", TestCase::new("1 2", "3"));
        tests
    }

    fn set(pairs: &[(&str, &str)]) -> SolutionSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_suite_iterates_examples_first() {
        let order: Vec<_> = suite().iter().map(|(p, id, _)| (p, id.to_string())).collect();
        assert_eq!(
            order,
            vec![
                (Partition::Examples, "01".to_string()),
                (Partition::Hidden, "02".to_string())
            ]
        );
        assert_eq!(suite().len(), 2);
    }

    #[test]
    fn test_limits_must_be_positive() {
        assert_eq!(
            Limits::new(0, 256, None).unwrap_err(),
            ValidationError::NonPositiveLimit("time_seconds")
        );
        assert_eq!(
            Limits::new(1, 0, None).unwrap_err(),
            ValidationError::NonPositiveLimit("memory_mb")
        );
        assert_eq!(
            Limits::new(1, 256, Some(0)).unwrap_err(),
            ValidationError::NonPositiveLimit("max_file_size_kb")
        );
        let limits = Limits::new(2, 256, Some(64)).unwrap();
        assert_eq!(limits.time_seconds(), 2);
        assert_eq!(limits.memory_mb(), 256);
        assert_eq!(limits.max_file_size_kb(), Some(64));
    }

    #[test]
    fn test_evaluation_requires_tests_and_solutions() {
        let limits = Limits::new(1, 256, None).unwrap();
        assert_eq!(
            Evaluation::new(TestSuite::new(), vec![set(&[("c", "x")])], limits).unwrap_err(),
            ValidationError::NoTests
        );
        assert_eq!(
            Evaluation::new(suite(), vec![SolutionSet::new()], limits).unwrap_err(),
            ValidationError::NoSolutions
        );
        assert_eq!(
            Evaluation::new(suite(), vec![], limits).unwrap_err(),
            ValidationError::NoSolutions
        );
    }

    #[test]
    fn test_solution_lookup_follows_preference() {
        let limits = Limits::new(1, 256, None).unwrap();
        let evaluation = Evaluation::new(
            suite(),
            vec![
                set(&[("cpp", "main")]),
                set(&[("cpp", "accepted"), ("py", "print()")]),
            ],
            limits,
        )
        .unwrap();
        assert_eq!(evaluation.solution_for("cpp"), Some("main"));
        assert_eq!(evaluation.solution_for("py"), Some("print()"));
        assert_eq!(evaluation.solution_for("java"), None);
        assert_eq!(evaluation.languages(), vec!["cpp", "py"]);
    }
}
