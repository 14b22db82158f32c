//! Typed IC syntax tree
//!
//! Every node arrives scope-resolved and typed from semantic analysis. The
//! backend only reads it; node ids key the side tables built per method.

pub mod ops;
pub mod expressions;
pub mod statements;
pub mod build;

pub use ops::{BinaryOp, UnaryOp};
pub use expressions::{Expression, ExpressionKind, Literal, Location};
pub use statements::{
    ClassDecl, FieldDecl, Formal, MethodDecl, MethodKind, Program, ScopeSymbol, Statement,
    StatementKind, SymbolKind,
};

use icc_common::NodeId;

/// Hands out node ids in creation order, starting at 0
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator(NodeId);

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = self.0;
        self.0 += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generator() {
        let mut ids = NodeIdGenerator::new();
        assert_eq!(ids.fresh(), 0);
        assert_eq!(ids.fresh(), 1);
        assert_eq!(ids.issued(), 2);
    }
}
