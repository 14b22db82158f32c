//! Common types used throughout the compiler
//!
//! This module defines the semantic types of IC and the identifiers shared
//! between the AST and the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AST node identifier, unique within one program
pub type NodeId = u32;

/// Label counter value for code generation
pub type LabelId = u32;

/// Name of the class that hosts the runtime library methods
pub const LIBRARY_CLASS: &str = "Library";

/// Size of one machine word in bytes; every field and array cell is one word
pub const WORD_SIZE: usize = 4;

/// Semantic type of an IC value, as resolved by the type checker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Bool,
    String,
    Void,
    /// Type of the `null` literal
    Null,
    /// Reference to an instance of the named class
    Class(String),
    /// Array with the given element type
    Array(Box<Type>),
}

impl Type {
    pub fn array_of(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn class(name: &str) -> Self {
        Type::Class(name.to_string())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    /// Class name if this is a class reference
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Element type if this is an array
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}
