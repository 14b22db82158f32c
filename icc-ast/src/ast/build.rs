//! Typed AST construction helpers
//!
//! The front end hands over finished trees, but tests and tools need to build
//! small programs by hand. `AstBuilder` hands out fresh node ids and fills in
//! the result type of operators so callers only state what the type checker
//! would have had to look up.

use super::expressions::{Expression, ExpressionKind, Literal, Location};
use super::ops::{BinaryOp, UnaryOp};
use super::statements::{Statement, StatementKind};
use super::NodeIdGenerator;
use icc_common::{SourceSpan, Type};

#[derive(Debug, Default)]
pub struct AstBuilder {
    ids: NodeIdGenerator,
    line: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source line recorded on every node built from now on
    pub fn at_line(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    fn expr(&mut self, kind: ExpressionKind, expr_type: Type) -> Expression {
        let id = self.ids.fresh();
        Expression::new(id, kind, SourceSpan::line(self.line), expr_type)
    }

    fn stmt(&mut self, kind: StatementKind) -> Statement {
        let id = self.ids.fresh();
        Statement::new(id, kind, SourceSpan::line(self.line))
    }

    // Expressions

    pub fn int(&mut self, value: i64) -> Expression {
        self.expr(ExpressionKind::Literal(Literal::Int(value)), Type::Int)
    }

    pub fn boolean(&mut self, value: bool) -> Expression {
        self.expr(ExpressionKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn string(&mut self, text: &str) -> Expression {
        self.expr(ExpressionKind::Literal(Literal::Str(text.to_string())), Type::String)
    }

    pub fn null(&mut self) -> Expression {
        self.expr(ExpressionKind::Literal(Literal::Null), Type::Null)
    }

    pub fn local(&mut self, name: &str, ty: Type) -> Expression {
        self.expr(ExpressionKind::Location(Location::Local(name.to_string())), ty)
    }

    /// Field of `this`, written without an explicit object
    pub fn this_field(&mut self, class_name: &str, name: &str, ty: Type) -> Expression {
        self.expr(
            ExpressionKind::Location(Location::Field {
                object: None,
                class_name: class_name.to_string(),
                name: name.to_string(),
            }),
            ty,
        )
    }

    /// `object.name`; the declaring class is taken from the object's type
    pub fn field(&mut self, object: Expression, name: &str, ty: Type) -> Expression {
        let class_name = object.expr_type.class_name().unwrap_or_default().to_string();
        self.expr(
            ExpressionKind::Location(Location::Field {
                object: Some(Box::new(object)),
                class_name,
                name: name.to_string(),
            }),
            ty,
        )
    }

    pub fn index(&mut self, array: Expression, index: Expression) -> Expression {
        let elem = array.expr_type.element_type().cloned().unwrap_or(Type::Int);
        self.expr(
            ExpressionKind::Location(Location::Array {
                array: Box::new(array),
                index: Box::new(index),
            }),
            elem,
        )
    }

    pub fn static_call(
        &mut self,
        class_name: &str,
        name: &str,
        arguments: Vec<Expression>,
        return_type: Type,
    ) -> Expression {
        self.expr(
            ExpressionKind::StaticCall {
                class_name: class_name.to_string(),
                name: name.to_string(),
                arguments,
            },
            return_type,
        )
    }

    pub fn library_call(&mut self, name: &str, arguments: Vec<Expression>, return_type: Type) -> Expression {
        self.static_call(icc_common::LIBRARY_CLASS, name, arguments, return_type)
    }

    /// Virtual call on an explicit receiver
    pub fn virtual_call(
        &mut self,
        receiver: Expression,
        name: &str,
        arguments: Vec<Expression>,
        return_type: Type,
    ) -> Expression {
        let class_name = receiver.expr_type.class_name().unwrap_or_default().to_string();
        self.expr(
            ExpressionKind::VirtualCall {
                receiver: Some(Box::new(receiver)),
                class_name,
                name: name.to_string(),
                arguments,
            },
            return_type,
        )
    }

    /// Virtual call on the implicit `this` of `class_name`
    pub fn this_call(
        &mut self,
        class_name: &str,
        name: &str,
        arguments: Vec<Expression>,
        return_type: Type,
    ) -> Expression {
        self.expr(
            ExpressionKind::VirtualCall {
                receiver: None,
                class_name: class_name.to_string(),
                name: name.to_string(),
                arguments,
            },
            return_type,
        )
    }

    pub fn this(&mut self, class_name: &str) -> Expression {
        self.expr(ExpressionKind::This, Type::class(class_name))
    }

    pub fn new_class(&mut self, class_name: &str) -> Expression {
        self.expr(
            ExpressionKind::NewClass {
                class_name: class_name.to_string(),
            },
            Type::class(class_name),
        )
    }

    pub fn new_array(&mut self, element_type: Type, size: Expression) -> Expression {
        let ty = Type::array_of(element_type.clone());
        self.expr(
            ExpressionKind::NewArray {
                element_type,
                size: Box::new(size),
            },
            ty,
        )
    }

    pub fn length(&mut self, array: Expression) -> Expression {
        self.expr(ExpressionKind::Length(Box::new(array)), Type::Int)
    }

    pub fn binary(&mut self, op: BinaryOp, left: Expression, right: Expression) -> Expression {
        let ty = if op == BinaryOp::Add && left.expr_type.is_string() {
            Type::String
        } else if op.is_arithmetic() {
            Type::Int
        } else {
            Type::Bool
        };
        self.expr(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Expression) -> Expression {
        let ty = match op {
            UnaryOp::Neg => Type::Int,
            UnaryOp::Not => Type::Bool,
        };
        self.expr(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    // Statements

    pub fn assign(&mut self, target: Expression, value: Expression) -> Statement {
        self.stmt(StatementKind::Assignment { target, value })
    }

    pub fn call_stmt(&mut self, call: Expression) -> Statement {
        self.stmt(StatementKind::Call(call))
    }

    pub fn ret(&mut self, value: Option<Expression>) -> Statement {
        self.stmt(StatementKind::Return(value))
    }

    pub fn if_stmt(&mut self, condition: Expression, then_stmt: Statement, else_stmt: Option<Statement>) -> Statement {
        self.stmt(StatementKind::If {
            condition,
            then_stmt: Box::new(then_stmt),
            else_stmt: else_stmt.map(Box::new),
        })
    }

    pub fn while_stmt(&mut self, condition: Expression, body: Statement) -> Statement {
        self.stmt(StatementKind::While {
            condition,
            body: Box::new(body),
        })
    }

    pub fn break_stmt(&mut self) -> Statement {
        self.stmt(StatementKind::Break)
    }

    pub fn continue_stmt(&mut self) -> Statement {
        self.stmt(StatementKind::Continue)
    }

    pub fn block(&mut self, statements: Vec<Statement>) -> Statement {
        self.stmt(StatementKind::Block(statements))
    }

    pub fn local_var(&mut self, name: &str, var_type: Type, init: Option<Expression>) -> Statement {
        self.stmt(StatementKind::LocalVariable {
            name: name.to_string(),
            var_type,
            init,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_assigns_unique_ids() {
        let mut b = AstBuilder::new();
        let x = b.local("x", Type::Int);
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, x, one);
        if let ExpressionKind::Binary { left, right, .. } = &sum.kind {
            assert_eq!(left.node_id, 0);
            assert_eq!(right.node_id, 1);
        } else {
            panic!("expected binary node");
        }
        assert_eq!(sum.node_id, 2);
        assert_eq!(sum.expr_type, Type::Int);
    }

    #[test]
    fn test_operator_result_types() {
        let mut b = AstBuilder::new();
        let s = b.string("a");
        let t = b.string("b");
        let cat = b.binary(BinaryOp::Add, s, t);
        assert_eq!(cat.expr_type, Type::String);

        let one = b.int(1);
        let two = b.int(2);
        let lt = b.binary(BinaryOp::Less, one, two);
        assert_eq!(lt.expr_type, Type::Bool);
    }

    #[test]
    fn test_field_takes_class_from_object() {
        let mut b = AstBuilder::new();
        let p = b.local("p", Type::class("Point"));
        let fx = b.field(p, "x", Type::Int);
        match fx.kind {
            ExpressionKind::Location(Location::Field { class_name, .. }) => assert_eq!(class_name, "Point"),
            _ => panic!("expected field location"),
        }
    }

    #[test]
    fn test_at_line_sets_span() {
        let mut b = AstBuilder::new();
        b.at_line(12);
        let stmt = b.break_stmt();
        assert_eq!(stmt.span.line_number(), 12);
    }
}
