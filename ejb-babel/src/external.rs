//! External programs: the PDF compiler and the raster image converter
//!
//! Both are blocking subprocess calls behind a trait, so writers can be exercised without the
//! programs installed. A non-zero exit status is an I/O error for the file being converted.

use crate::error::ConvertError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Turns a LaTeX document into a PDF.
pub trait PdfCompiler: Send + Sync {
    /// Compile `source` and return the path of the PDF written to `output_dir`.
    fn compile(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, ConvertError>;
}

/// Rasterizes an image (EPS, SVG, PDF) to a format browsers can display.
pub trait ImageConverter: Send + Sync {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;
}

/// `pdflatex` (or a compatible engine) found on `PATH`.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
}

impl LatexCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for LatexCompiler {
    fn default() -> Self {
        Self::new("pdflatex")
    }
}

impl PdfCompiler for LatexCompiler {
    fn compile(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, ConvertError> {
        let program = locate(&self.program)?;
        let working_dir = source.parent().unwrap_or(output_dir);

        tracing::debug!(program = %program.display(), source = %source.display(), "compiling statement");
        let mut command = Command::new(&program);
        command
            .arg("-halt-on-error")
            .arg("-interaction=nonstopmode")
            .arg(format!("-output-directory={}", output_dir.display()))
            .arg(source)
            .current_dir(working_dir);
        run(&mut command, &self.program)?;

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pdf = output_dir.join(format!("{stem}.pdf"));
        if !pdf.is_file() {
            return Err(ConvertError::io(
                format!("{} produced no {}", self.program, pdf.display()),
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }
        Ok(pdf)
    }
}

/// ImageMagick style `<program> <input> <output>` converter.
#[derive(Debug, Clone)]
pub struct ImageMagick {
    program: String,
}

impl ImageMagick {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ImageConverter for ImageMagick {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        let program = locate(&self.program)?;
        tracing::debug!(input = %input.display(), output = %output.display(), "converting image");
        let mut command = Command::new(&program);
        command.arg(input).arg(output);
        run(&mut command, &self.program)?;
        Ok(())
    }
}

fn locate(program: &str) -> Result<PathBuf, ConvertError> {
    which::which(program).map_err(|err| {
        ConvertError::io(
            format!("cannot find '{program}'"),
            io::Error::new(io::ErrorKind::NotFound, err),
        )
    })
}

fn run(command: &mut Command, name: &str) -> Result<Output, ConvertError> {
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|err| ConvertError::io(format!("failed to run {name}"), err))?;

    if !output.status.success() {
        let log = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = log.lines().chain(stderr.lines()).rev().take(5).collect();
        let detail = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
        return Err(ConvertError::io(
            format!("{name} exited with {}", output.status),
            io::Error::other(detail),
        ));
    }
    Ok(output)
}
