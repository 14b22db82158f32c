//! Code generation error types
//!
//! The backend trusts the type checker, so every variant here means the input
//! contract was broken or the generator itself is wrong. Generation stops at
//! the first one.

use icc_codegen::RegAllocError;
use icc_common::{CompilerError, NodeId, SourceLocation};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("Unknown class '{name}'")]
    UnknownClass { name: String },

    #[error("Class '{class}' has no field '{field}'")]
    UnknownField { class: String, field: String },

    #[error("Class '{class}' has no virtual method '{method}'")]
    UnknownMethod { class: String, method: String },

    #[error("Class '{class}' has no static method '{method}'")]
    UnknownStaticMethod { class: String, method: String },

    #[error("Cannot resolve the superclass chain of: {}", classes.join(", "))]
    UnresolvedInheritance { classes: Vec<String> },

    #[error("'{statement}' outside of a loop at {location}")]
    LoopControlOutsideLoop {
        statement: &'static str,
        location: SourceLocation,
    },

    #[error("Assignment target is not a location at {location}")]
    InvalidAssignmentTarget { location: SourceLocation },

    #[error("No weight recorded for expression node {0}")]
    MissingWeight(NodeId),

    #[error("Register allocation failed: {0}")]
    RegisterAllocation(#[from] RegAllocError),
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::LoopControlOutsideLoop { statement, location } => {
                CompilerError::codegen_error(format!("'{}' outside of a loop", statement), location)
            }
            CodegenError::InvalidAssignmentTarget { location } => CompilerError::codegen_error(
                "Assignment target is not a location".to_string(),
                location,
            ),
            other => CompilerError::internal(other.to_string()),
        }
    }
}
