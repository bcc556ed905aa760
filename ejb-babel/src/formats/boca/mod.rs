//! BOCA package format
//!
//!     BOCA (http://bombonera.org/) problems are zip files with a fixed tree. This crate reads and
//!     writes the tree below, which extends the stock layout with `tex/` (the statement split in
//!     sections), `solutions/` and `description/tags.csv`:
//!
//!     .
//!     ├── description
//!     │   ├── problem.info        # basename=, fullname=, descfile=
//!     │   ├── <id>.pdf            # statement, compiled from tex/
//!     │   └── tags.csv
//!     ├── tex
//!     │   ├── title.tex, description.tex, input.tex, output.tex
//!     │   ├── notes.tex, tutorial.tex          (optional)
//!     │   ├── examples.csv        # test names that are examples
//!     │   ├── main.tex, problem.cls
//!     │   └── <images>
//!     ├── input/<n>, output/<n>
//!     ├── solutions/<main|accepted>.<lang>
//!     └── limits/<lang>           # shell scripts echoing time, repetitions, memory, file size
//!
//!     Compile, run and compare scripts are not generated; they are copied from the optional
//!     template directory (`boca.template_dir`).

mod reader;
mod writer;

use crate::archive::Archive;
use crate::error::ConvertError;
use crate::external::{LatexCompiler, PdfCompiler};
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::reader::PackageReader;
use ejb::Problem;
use std::path::{Path, PathBuf};

pub use reader::BocaReader;

/// BOCA reader and writer.
///
/// Statements are compiled with `boca.pdf_compiler` unless a compiler is injected.
#[derive(Default)]
pub struct BocaFormat {
    compiler: Option<Box<dyn PdfCompiler>>,
}

impl BocaFormat {
    pub fn with_compiler(compiler: impl PdfCompiler + 'static) -> Self {
        Self {
            compiler: Some(Box::new(compiler)),
        }
    }
}

impl Format for BocaFormat {
    fn name(&self) -> &str {
        "boca"
    }

    fn description(&self) -> &str {
        "BOCA online contest administrator packages"
    }

    fn file_extensions(&self) -> &[&str] {
        &["zip"]
    }

    fn supports_reading(&self) -> bool {
        true
    }

    fn supports_writing(&self) -> bool {
        true
    }

    fn read(&self, source: &Path, options: &ConvertOptions) -> Result<Problem, ConvertError> {
        let archive = Archive::open(source)?;
        BocaReader::new(&archive, source, &options.boca)?.assemble()
    }

    fn write(
        &self,
        problem: &Problem,
        output_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let path = match &self.compiler {
            Some(compiler) => writer::write_package(problem, output_dir, &options.boca, compiler.as_ref())?,
            None => {
                let compiler = LatexCompiler::new(options.boca.pdf_compiler.as_str());
                writer::write_package(problem, output_dir, &options.boca, &compiler)?
            }
        };
        Ok(vec![path])
    }
}
