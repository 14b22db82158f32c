//! Expression AST nodes for IC

use super::ops::{BinaryOp, UnaryOp};
use icc_common::{NodeId, SourceSpan, Type};
use serde::{Deserialize, Serialize};

/// A typed expression; `expr_type` is the type the checker assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub node_id: NodeId,
    pub kind: ExpressionKind,
    #[serde(default)]
    pub span: SourceSpan,
    /// Semantic type resolved by the type checker
    pub expr_type: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Literal),

    /// Variable, field or array element reference
    Location(Location),

    /// Call of a static method, `C.f(...)`, or of a `Library` routine
    StaticCall {
        class_name: String,
        name: String,
        arguments: Vec<Expression>,
    },

    /// Call through the dispatch vector; `receiver` is `None` for implicit `this`
    VirtualCall {
        receiver: Option<Box<Expression>>,
        /// Static class of the receiver
        class_name: String,
        name: String,
        arguments: Vec<Expression>,
    },

    This,

    NewClass {
        class_name: String,
    },

    NewArray {
        element_type: Type,
        size: Box<Expression>,
    },

    /// `arr.length`
    Length(Box<Expression>),

    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
}

/// A resolved storage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// Local variable or formal parameter of the enclosing method
    Local(String),

    /// Field of an object; `object` is `None` for an implicit `this` field
    Field {
        object: Option<Box<Expression>>,
        /// Static class that declares or inherits the field
        class_name: String,
        name: String,
    },

    Array {
        array: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    pub fn new(node_id: NodeId, kind: ExpressionKind, span: SourceSpan, expr_type: Type) -> Self {
        Self {
            node_id,
            kind,
            span,
            expr_type,
        }
    }

    /// Short node kind name, used for source annotations and logging
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExpressionKind::Literal(_) => "Literal",
            ExpressionKind::Location(Location::Local(_)) => "VariableLocation",
            ExpressionKind::Location(Location::Field { .. }) => "FieldLocation",
            ExpressionKind::Location(Location::Array { .. }) => "ArrayLocation",
            ExpressionKind::StaticCall { .. } => "StaticCall",
            ExpressionKind::VirtualCall { .. } => "VirtualCall",
            ExpressionKind::This => "This",
            ExpressionKind::NewClass { .. } => "NewClass",
            ExpressionKind::NewArray { .. } => "NewArray",
            ExpressionKind::Length(_) => "Length",
            ExpressionKind::Binary { .. } => "BinaryOp",
            ExpressionKind::Unary { .. } => "UnaryOp",
        }
    }
}
