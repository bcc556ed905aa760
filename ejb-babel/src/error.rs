//! Error type shared by readers, writers and the conversion driver

use ejb::ValidationError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The problem breaks a model invariant, or lacks what the destination needs.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Package contents do not have the shape the source format expects.
    #[error("malformed package: {0}")]
    Format(String),

    /// Archive, file system or subprocess failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Invalid options. Raised before any file is processed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("{0}")]
    NotSupported(String),
}

impl ConvertError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ConvertError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        ConvertError::Format(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ConvertError::Configuration(message.into())
    }

    /// Errors the driver records against one input file before moving on to the next. Anything
    /// else aborts the whole run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ConvertError::Validation(_) | ConvertError::Format(_) | ConvertError::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_classification() {
        assert!(ConvertError::from(ValidationError::NoTests).is_per_file());
        assert!(ConvertError::format("missing problem.xml").is_per_file());
        assert!(ConvertError::io("reading x.zip", io::Error::other("boom")).is_per_file());
        assert!(!ConvertError::configuration("penalty").is_per_file());
        assert!(!ConvertError::FormatNotFound("moodle".into()).is_per_file());
        assert!(!ConvertError::NotSupported("read".into()).is_per_file());
    }

    #[test]
    fn test_messages() {
        let err = ConvertError::io("opening a.zip", io::Error::other("denied"));
        assert_eq!(err.to_string(), "opening a.zip: denied");
        let err = ConvertError::from(ValidationError::MissingSolution("py".into()));
        assert_eq!(err.to_string(), "no py solution available");
    }
}
