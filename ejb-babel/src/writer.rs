//! Writer step protocol
//!
//! Writers fill in only the steps their layout needs. The steps always run in the order below,
//! so whatever has been written when a step fails is a prefix of the complete package.

use crate::error::ConvertError;
use ejb::Problem;

pub trait PackageWriter {
    fn write_id(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_title(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_description(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_input(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_output(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_examples(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_aux_files(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_tags(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_tutorial(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_notes(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_tests(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_solutions(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }
    fn write_limits(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        Ok(())
    }

    fn write_steps(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.write_id(problem)?;
        self.write_title(problem)?;
        self.write_description(problem)?;
        self.write_input(problem)?;
        self.write_output(problem)?;
        self.write_examples(problem)?;
        self.write_aux_files(problem)?;
        self.write_tags(problem)?;
        self.write_tutorial(problem)?;
        self.write_notes(problem)?;
        self.write_tests(problem)?;
        self.write_solutions(problem)?;
        self.write_limits(problem)
    }
}
