//! Validation errors for the canonical model
//!
//! Raised when a model invariant does not hold at construction time, and reused by writers
//! when a destination format needs data the problem does not carry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is missing or blank.
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// The problem id would not name a single file.
    #[error("problem id `{0}` must not contain path separators")]
    InvalidId(String),

    /// A statement example has a blank input or output side.
    #[error("example {index} has an empty {side}")]
    EmptyExample { index: usize, side: &'static str },

    #[error("a statement needs at least one example")]
    NoExamples,

    #[error("no test data: both the example and the hidden partitions are empty")]
    NoTests,

    #[error("no solutions: at least one non-empty solution set is required")]
    NoSolutions,

    #[error("limit `{0}` must be strictly positive")]
    NonPositiveLimit(&'static str),

    /// A statement references an image that is not among its auxiliary files.
    #[error("cannot find image `{0}` among the statement files")]
    MissingImage(String),

    /// An auxiliary file the destination cannot embed.
    #[error("file `{0}` is not an accepted raster image (jpg, jpeg, png, gif)")]
    UnsupportedImage(String),

    #[error("no {0} solution available")]
    MissingSolution(String),
}
