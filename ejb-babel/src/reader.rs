//! Reader step protocol
//!
//!     A source format only knows how to pull each piece out of its own package layout. The
//!     assembly into a Problem, and therefore all validation, is shared: every step runs first,
//!     so a malformed package reports the missing entry rather than a derived model error, and
//!     only then are the Statement, Evaluation and Problem constructed.

use crate::error::ConvertError;
use ejb::{AuxFiles, Evaluation, Limits, Problem, SolutionSet, StatementBuilder, TestCase, TestSuite};

pub trait PackageReader {
    fn read_id(&self) -> Result<String, ConvertError>;
    fn read_title(&self) -> Result<String, ConvertError>;
    fn read_description(&self) -> Result<String, ConvertError>;
    fn read_input_spec(&self) -> Result<String, ConvertError>;
    fn read_output_spec(&self) -> Result<String, ConvertError>;
    fn read_examples(&self) -> Result<Vec<TestCase>, ConvertError>;
    fn read_aux_files(&self) -> Result<AuxFiles, ConvertError>;
    fn read_tags(&self) -> Result<Vec<String>, ConvertError>;
    fn read_tutorial(&self) -> Result<Option<String>, ConvertError>;
    fn read_notes(&self) -> Result<Option<String>, ConvertError>;
    fn read_tests(&self) -> Result<TestSuite, ConvertError>;
    fn read_solutions(&self) -> Result<Vec<SolutionSet>, ConvertError>;
    fn read_limits(&self) -> Result<Limits, ConvertError>;

    /// Run every step and build the validated Problem.
    fn assemble(&self) -> Result<Problem, ConvertError> {
        let id = self.read_id()?;
        let title = self.read_title()?;
        let description = self.read_description()?;
        let input = self.read_input_spec()?;
        let output = self.read_output_spec()?;
        let examples = self.read_examples()?;
        let aux_files = self.read_aux_files()?;
        let tags = self.read_tags()?;
        let tutorial = self.read_tutorial()?;
        let notes = self.read_notes()?;
        let tests = self.read_tests()?;
        let solutions = self.read_solutions()?;
        let limits = self.read_limits()?;

        let statement = StatementBuilder::new(title, description, input, output)
            .examples(examples)
            .aux_files(aux_files)
            .tags(tags)
            .tutorial(tutorial)
            .notes(notes)
            .build()?;
        let evaluation = Evaluation::new(tests, solutions, limits)?;
        Ok(Problem::new(id, statement, evaluation)?)
    }
}
