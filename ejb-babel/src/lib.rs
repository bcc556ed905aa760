//! Problem package formats for e-judges
//!
//!     This crate converts programming problems between the package formats of different
//!     e-judges. Every format maps its package to the canonical `ejb::Problem` and/or back, so
//!     any readable format converts to any writable one.
//!
//! Architecture
//!
//!     - Format trait: uniform read/write interface, with NotSupported defaults
//!     - FormatRegistry: discovery and selection of formats by name
//!     - PackageReader / PackageWriter: the fixed sequence of steps every format follows
//!     - convert: the batch driver used by the CLI
//!
//!     Like every library in the workspace this crate does not print, read environment
//!     variables or exit; it logs through `tracing` and returns errors.
//!
//!     The file structure:
//!     .
//!     ├── archive.rs              # zip packages, read into memory / streamed out
//!     ├── convert.rs              # batch driver and report
//!     ├── error.rs
//!     ├── external.rs             # pdflatex and image converter subprocesses
//!     ├── format.rs               # Format trait definition
//!     ├── options.rs              # per-format options
//!     ├── reader.rs, writer.rs    # step protocols
//!     ├── registry.rs
//!     ├── xml.rs                  # element tree, CDATA literal blocks
//!     └── formats
//!         ├── boca                # read + write
//!         ├── coderunner          # write
//!         └── polygon             # read
//!
//! Testing
//!
//!     Unit tests sit next to the code. tests/ holds conversions between formats, built from zip
//!     fixtures generated on the fly (tests/common). External programs are replaced by fakes.

pub mod archive;
pub mod convert;
pub mod error;
pub mod external;
pub mod format;
pub mod formats;
pub mod options;
pub mod reader;
pub mod registry;
pub mod writer;
pub mod xml;

pub use convert::{collect_inputs, convert, BatchReport, ConvertSpec, FileReport, Outcome};
pub use error::ConvertError;
pub use external::{ImageConverter, ImageMagick, LatexCompiler, PdfCompiler};
pub use format::Format;
pub use options::{BocaOptions, CodeRunnerOptions, ConvertOptions, DefaultLimits, Headings, PolygonOptions};
pub use reader::PackageReader;
pub use registry::FormatRegistry;
pub use writer::PackageWriter;
