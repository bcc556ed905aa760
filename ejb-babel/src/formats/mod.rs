//! Format implementations
//!
//! Each package format is a self-contained module exposing one type that implements
//! [`Format`](crate::Format).

pub mod boca;
pub mod coderunner;
pub mod polygon;

pub use boca::BocaFormat;
pub use coderunner::CodeRunnerFormat;
pub use polygon::PolygonFormat;
