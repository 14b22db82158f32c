//! Error handling for the IC compiler
//!
//! Front-end diagnostics are produced before the AST reaches this workspace,
//! so the top-level error only has to describe I/O trouble, malformed AST
//! input, and internal defects found while generating LIR.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type shared by every crate of the workspace
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Malformed AST input: {message}")]
    SerializationError { message: String },

    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a code generation error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CompilerError::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CompilerError {
    fn from(err: serde_json::Error) -> Self {
        CompilerError::SerializationError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codegen_error_display() {
        let err = CompilerError::codegen_error(
            "unknown field 'z' in class Point".to_string(),
            SourceLocation::new("Point.ic", 4, 9),
        );
        assert_eq!(
            err.to_string(),
            "Code generation error at Point.ic:4:9: unknown field 'z' in class Point"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CompilerError = io.into();
        assert!(matches!(err, CompilerError::IoError { .. }));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_json_error_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("{ not json");
        let err: CompilerError = match bad {
            Ok(_) => panic!("input should not parse"),
            Err(e) => e.into(),
        };
        assert!(matches!(err, CompilerError::SerializationError { .. }));
    }

    #[test]
    fn test_internal_from_string() {
        let err: CompilerError = "layout missing".to_string().into();
        assert_eq!(err, CompilerError::internal("layout missing"));
        assert_eq!(err.to_string(), "Internal compiler error: layout missing");
    }
}
