//! IC Compiler - Typed AST
//!
//! This crate holds the abstract syntax tree handed over by the IC front end
//! once scope and type checking have succeeded. Every node the backend visits
//! is already resolved: locations know whether they name a local or a field,
//! calls know the static class they dispatch through, and every expression
//! carries its semantic type.

pub mod ast;

pub use ast::{
    BinaryOp, ClassDecl, Expression, ExpressionKind, FieldDecl, Formal, Literal, Location,
    MethodDecl, MethodKind, NodeIdGenerator, Program, ScopeSymbol, Statement, StatementKind,
    SymbolKind, UnaryOp,
};
pub use ast::build::AstBuilder;
pub use icc_common::{NodeId, Type};
