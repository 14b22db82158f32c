//! Sethi–Ullman weight analysis
//!
//! Before a method body is lowered, every expression in it is annotated with
//! an estimate of the registers needed to evaluate it and whether evaluating
//! it can have side effects. The lowering of binary operators reads these to
//! decide which operand to evaluate first.
//!
//! Annotations live in a side table keyed by node id, so the AST itself stays
//! immutable.

use crate::error::CodegenError;
use icc_ast::{Expression, ExpressionKind, Location, MethodDecl, Statement, StatementKind};
use icc_common::NodeId;
use log::trace;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprWeight {
    pub weight: u32,
    /// The subtree contains a call
    pub side_effect: bool,
}

impl ExprWeight {
    fn pure(weight: u32) -> Self {
        Self {
            weight,
            side_effect: false,
        }
    }
}

/// Whether the left operand of a binary node must be evaluated first.
///
/// Side-effecting operands go first, and two side-effecting operands keep
/// their source order. Otherwise the heavier operand goes first, ties going
/// left.
pub fn evaluate_left_first(left: ExprWeight, right: ExprWeight) -> bool {
    match (left.side_effect, right.side_effect) {
        (true, _) => true,
        (false, true) => false,
        (false, false) => left.weight >= right.weight,
    }
}

/// Weights of every expression of one method
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<NodeId, ExprWeight>,
}

impl WeightTable {
    pub fn get(&self, node: NodeId) -> Result<ExprWeight, CodegenError> {
        self.weights
            .get(&node)
            .copied()
            .ok_or(CodegenError::MissingWeight(node))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Evaluation order for a pair of sibling operands
    pub fn left_first(&self, left: &Expression, right: &Expression) -> Result<bool, CodegenError> {
        Ok(evaluate_left_first(self.get(left.node_id)?, self.get(right.node_id)?))
    }
}

#[derive(Debug, Default)]
pub struct WeightAnalyzer {
    table: WeightTable,
}

impl WeightAnalyzer {
    /// Annotate every expression of `method`
    pub fn analyze_method(method: &MethodDecl) -> WeightTable {
        let mut analyzer = Self::default();
        analyzer.visit_block(&method.body);
        trace!("{}: {} expression weight(s)", method.name, analyzer.table.len());
        analyzer.table
    }

    /// Statements are visited last to first, the order in which their
    /// registers are later consumed
    fn visit_block(&mut self, statements: &[Statement]) {
        for stmt in statements.iter().rev() {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match &stmt.kind {
            StatementKind::Assignment { target, value } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            StatementKind::Call(call) => {
                self.visit_expr(call);
            }
            StatementKind::Return(value) => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            StatementKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                self.visit_statement(then_stmt);
                self.visit_expr(condition);
                if let Some(else_stmt) = else_stmt {
                    self.visit_statement(else_stmt);
                }
            }
            StatementKind::While { condition, body } => {
                self.visit_statement(body);
                self.visit_expr(condition);
            }
            StatementKind::Break | StatementKind::Continue => {}
            StatementKind::Block(statements) => self.visit_block(statements),
            StatementKind::LocalVariable { init, .. } => {
                if let Some(init) = init {
                    self.visit_expr(init);
                }
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expression) -> ExprWeight {
        let weight = match &expr.kind {
            ExpressionKind::Literal(_) => ExprWeight::pure(0),

            ExpressionKind::Location(Location::Local(_)) => ExprWeight::pure(1),
            ExpressionKind::Location(Location::Field { object, .. }) => match object {
                Some(object) => {
                    let obj = self.visit_expr(object);
                    ExprWeight {
                        weight: obj.weight.max(1),
                        side_effect: obj.side_effect,
                    }
                }
                None => ExprWeight::pure(1),
            },
            ExpressionKind::Location(Location::Array { array, index }) => {
                let a = self.visit_expr(array);
                let i = self.visit_expr(index);
                ExprWeight {
                    weight: a.weight + i.weight,
                    side_effect: a.side_effect || i.side_effect,
                }
            }

            ExpressionKind::StaticCall { arguments, .. } => ExprWeight {
                weight: self.visit_all(arguments),
                side_effect: true,
            },
            ExpressionKind::VirtualCall {
                receiver, arguments, ..
            } => {
                if let Some(receiver) = receiver {
                    self.visit_expr(receiver);
                }
                ExprWeight {
                    weight: self.visit_all(arguments) + 1,
                    side_effect: true,
                }
            }

            ExpressionKind::This => ExprWeight::pure(1),
            ExpressionKind::NewClass { .. } => ExprWeight::pure(1),
            ExpressionKind::NewArray { size, .. } => self.visit_expr(size),
            ExpressionKind::Length(array) => {
                let a = self.visit_expr(array);
                ExprWeight {
                    weight: a.weight.max(1),
                    side_effect: a.side_effect,
                }
            }

            ExpressionKind::Binary { left, right, .. } => {
                let l = self.visit_expr(left);
                let r = self.visit_expr(right);
                let weight = if l.weight == r.weight {
                    l.weight + 1
                } else {
                    l.weight.max(r.weight)
                };
                ExprWeight {
                    weight,
                    side_effect: l.side_effect || r.side_effect,
                }
            }
            ExpressionKind::Unary { operand, .. } => self.visit_expr(operand),
        };

        trace!(
            "{} #{}: weight {}{}",
            expr.kind_name(),
            expr.node_id,
            weight.weight,
            if weight.side_effect { ", side effect" } else { "" }
        );
        self.table.weights.insert(expr.node_id, weight);
        weight
    }

    fn visit_all(&mut self, exprs: &[Expression]) -> u32 {
        exprs.iter().map(|e| self.visit_expr(e).weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icc_ast::{AstBuilder, BinaryOp, MethodKind};
    use icc_common::Type;
    use pretty_assertions::assert_eq;

    fn method_with(body: Vec<Statement>) -> MethodDecl {
        MethodDecl::new("m", MethodKind::Static, vec![], Type::Void, body)
    }

    #[test]
    fn test_literal_weight_is_zero() {
        let mut b = AstBuilder::new();
        let lit = b.int(5);
        let id = lit.node_id;
        let stmt = b.local_var("x", Type::Int, Some(lit));
        let table = WeightAnalyzer::analyze_method(&method_with(vec![stmt]));
        assert_eq!(table.get(id).unwrap(), ExprWeight::pure(0));
    }

    #[test]
    fn test_equal_children_add_one() {
        let mut b = AstBuilder::new();
        let x = b.local("x", Type::Int);
        let y = b.local("y", Type::Int);
        let sum = b.binary(BinaryOp::Add, x, y);
        let id = sum.node_id;
        let stmt = b.local_var("z", Type::Int, Some(sum));
        let table = WeightAnalyzer::analyze_method(&method_with(vec![stmt]));
        assert_eq!(table.get(id).unwrap().weight, 2);
    }

    #[test]
    fn test_unequal_children_take_max() {
        let mut b = AstBuilder::new();
        let x = b.local("x", Type::Int);
        let y = b.local("y", Type::Int);
        let inner = b.binary(BinaryOp::Mul, x, y);
        let one = b.int(1);
        let left_heavy = b.binary(BinaryOp::Add, inner, one);
        let left_id = left_heavy.node_id;
        let two = b.int(2);
        let z = b.local("z", Type::Int);
        let right_heavy = b.binary(BinaryOp::Sub, two, z);
        let right_id = right_heavy.node_id;
        let s1 = b.local_var("a", Type::Int, Some(left_heavy));
        let s2 = b.local_var("c", Type::Int, Some(right_heavy));
        let table = WeightAnalyzer::analyze_method(&method_with(vec![s1, s2]));
        assert_eq!(table.get(left_id).unwrap().weight, 2);
        assert_eq!(table.get(right_id).unwrap().weight, 1);
    }

    #[test]
    fn test_calls_mark_side_effects_upward() {
        let mut b = AstBuilder::new();
        let arg = b.local("n", Type::Int);
        let call = b.static_call("A", "f", vec![arg], Type::Int);
        let call_id = call.node_id;
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, one, call);
        let sum_id = sum.node_id;
        let stmt = b.ret(Some(sum));
        let table = WeightAnalyzer::analyze_method(&method_with(vec![stmt]));

        let call_w = table.get(call_id).unwrap();
        assert_eq!(call_w, ExprWeight { weight: 1, side_effect: true });
        assert!(table.get(sum_id).unwrap().side_effect);
    }

    #[test]
    fn test_virtual_call_counts_receiver() {
        let mut b = AstBuilder::new();
        let call = b.this_call("A", "g", vec![], Type::Void);
        let id = call.node_id;
        let stmt = b.call_stmt(call);
        let table = WeightAnalyzer::analyze_method(&method_with(vec![stmt]));
        assert_eq!(table.get(id).unwrap().weight, 1);
    }

    #[test]
    fn test_nested_statements_are_visited() {
        let mut b = AstBuilder::new();
        let cond = b.boolean(true);
        let cond_id = cond.node_id;
        let v = b.int(3);
        let v_id = v.node_id;
        let inner = b.ret(Some(v));
        let body = b.block(vec![inner]);
        let stmt = b.while_stmt(cond, body);
        let table = WeightAnalyzer::analyze_method(&method_with(vec![stmt]));
        assert!(table.get(cond_id).is_ok());
        assert!(table.get(v_id).is_ok());
        assert_eq!(table.get(9999), Err(CodegenError::MissingWeight(9999)));
    }

    #[test]
    fn test_evaluation_order() {
        let pure = |w| ExprWeight::pure(w);
        let effect = |w| ExprWeight { weight: w, side_effect: true };

        assert!(evaluate_left_first(pure(2), pure(1)));
        assert!(evaluate_left_first(pure(1), pure(1)));
        assert!(!evaluate_left_first(pure(0), pure(1)));
        assert!(!evaluate_left_first(pure(5), effect(0)));
        assert!(evaluate_left_first(effect(0), pure(5)));
        assert!(evaluate_left_first(effect(0), effect(3)));
    }
}
