//! IC Compiler - Backend
//!
//! This crate lowers a type-checked IC program to LIR text:
//!
//! - `layout`: field offsets, dispatch slots and dispatch vectors per class
//! - `weights`: register-need estimates that order operand evaluation
//! - `lower`: AST to LIR translation and final program assembly
//! - `runtime`: the runtime check routines and their messages

pub mod error;
pub mod layout;
pub mod lower;
pub mod naming;
pub mod runtime;
pub mod strings;
pub mod weights;

pub use error::CodegenError;
pub use layout::{ClassLayout, FieldSlot, LayoutManager, MethodEntry};
pub use lower::{generate_program, CodeGenerator};
pub use naming::LabelGenerator;
pub use runtime::{RuntimeCheck, ERROR_EXIT};
pub use strings::StringLiteralPool;
pub use weights::{ExprWeight, WeightAnalyzer, WeightTable};

use icc_codegen::DEFAULT_REGISTER_COUNT;
use serde::{Deserialize, Serialize};

/// Options for code generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenOptions {
    /// Size of the symbolic register pool
    pub register_count: usize,
    /// Emit a `# line N: <statement>` comment before each statement
    pub annotate: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            register_count: DEFAULT_REGISTER_COUNT,
            annotate: false,
        }
    }
}
