//! # ejb
//!
//! Core types for converting competitive-programming problem packages between
//! e-judge formats.
//!
//! Architecture
//!
//!     - problem: the canonical, format independent model (Statement, Evaluation, Problem).
//!       Every constructor validates its invariants, so a value that exists is well formed.
//!     - markup: translation of the restricted statement markup dialect into HTML, used by every
//!       destination that renders statements on screen.
//!
//!     Reading and writing concrete package formats lives in `ejb-babel`, configuration in
//!     `ejb-config` and the command line in `ejb-cli`. This crate does no I/O at all.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ValidationError
//!     ├── problem.rs              # Problem + re-exports
//!     ├── problem
//!     │   ├── statement.rs        # Statement, StatementBuilder
//!     │   └── evaluation.rs       # Evaluation, TestSuite, Limits
//!     ├── markup.rs               # Translator entry point
//!     └── markup
//!         ├── math.rs             # phase 1, plus math span protection
//!         ├── images.rs           # phase 2
//!         ├── fonts.rs            # phase 3
//!         ├── environments.rs     # phase 4
//!         ├── text.rs             # phase 5
//!         └── diagnostics.rs      # phase 6

pub mod error;
pub mod markup;
pub mod problem;

pub use error::ValidationError;
pub use markup::{translate, ImageIndex, MarkupWarning, Translation, Translator};
pub use problem::{
    AuxFiles, Evaluation, Limits, Partition, Problem, SolutionSet, Statement, StatementBuilder,
    TestCase, TestSuite,
};
