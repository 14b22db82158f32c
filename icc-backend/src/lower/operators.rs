//! Operator lowering
//!
//! The result of a binary operator always ends up in the register holding
//! its left operand. Which operand is evaluated first is decided by the
//! weight table, except for `&&` and `||` which short-circuit left to right.

use super::expressions::lower_expression;
use super::CodeGenerator;
use crate::error::CodegenError;
use crate::runtime::RuntimeCheck;
use icc_ast::{BinaryOp, Expression, UnaryOp};
use icc_codegen::{ArithOp, JumpCond, LirInst, Operand, Reg};

pub(super) fn lower_binary(
    gen: &mut CodeGenerator,
    expr: &Expression,
    op: BinaryOp,
    left: &Expression,
    right: &Expression,
) -> Result<Operand, CodegenError> {
    if op.is_logical() {
        return lower_short_circuit(gen, op, left, right);
    }

    let (target, source) = lower_operands(gen, left, right)?;

    if expr.expr_type.is_string() {
        gen.emit(LirInst::Library {
            func: "__stringCat".to_string(),
            args: vec![target.into(), source],
            dst: Some(target),
        });
        return Ok(Operand::Reg(target));
    }

    if op.is_arithmetic() {
        lower_arithmetic(gen, op, target, source)?;
    } else {
        lower_comparison(gen, op, target, source);
    }
    Ok(Operand::Reg(target))
}

/// Evaluate both operands in weight order. The left one lands in a register
/// the caller may overwrite, the right one in any source operand.
fn lower_operands(gen: &mut CodeGenerator, left: &Expression, right: &Expression) -> Result<(Reg, Operand), CodegenError> {
    if gen.weights.left_first(left, right)? {
        let l = lower_expression(gen, left)?;
        let target = gen.load_owned(l)?;
        let r = lower_expression(gen, right)?;
        let source = gen.value(r)?;
        Ok((target, source))
    } else {
        let r = lower_expression(gen, right)?;
        let source = gen.value(r)?;
        let l = lower_expression(gen, left)?;
        let target = gen.load_owned(l)?;
        Ok((target, source))
    }
}

fn lower_arithmetic(gen: &mut CodeGenerator, op: BinaryOp, target: Reg, source: Operand) -> Result<(), CodegenError> {
    let arith = match op {
        BinaryOp::Add => ArithOp::Add,
        BinaryOp::Sub => ArithOp::Sub,
        BinaryOp::Mul => ArithOp::Mul,
        BinaryOp::Div => ArithOp::Div,
        _ => ArithOp::Mod,
    };

    if matches!(arith, ArithOp::Div | ArithOp::Mod) {
        match source.literal_value() {
            // a constant zero divisor always fails
            Some(0) => {
                gen.emit(LirInst::jump(RuntimeCheck::Zero.error_label()));
                return Ok(());
            }
            Some(_) => {}
            None => gen.emit(RuntimeCheck::Zero.call(vec![source.clone()])),
        }
    }

    match (arith, source.literal_value()) {
        (ArithOp::Add, Some(1)) => gen.emit(LirInst::Inc(target)),
        (ArithOp::Sub, Some(1)) => gen.emit(LirInst::Dec(target)),
        _ => gen.emit(LirInst::Arith {
            op: arith,
            src: source,
            dst: target,
        }),
    }
    Ok(())
}

/// `Compare right, left`, branch on the flags, then write 0 or 1 to `target`
fn lower_comparison(gen: &mut CodeGenerator, op: BinaryOp, target: Reg, source: Operand) {
    let cond = match op {
        BinaryOp::Less => JumpCond::Less,
        BinaryOp::LessEqual => JumpCond::LessEqual,
        BinaryOp::Greater => JumpCond::Greater,
        BinaryOp::GreaterEqual => JumpCond::GreaterEqual,
        BinaryOp::Equal => JumpCond::True,
        _ => JumpCond::False,
    };
    let labels = gen.labels.next_compare();

    gen.emit(LirInst::Compare {
        left: source,
        right: target,
    });
    gen.emit(LirInst::jump_if(cond, labels.true_label.clone()));
    materialize(gen, target, &labels.true_label, &labels.end_label);
}

/// Falls through to store 0, or reaches `true_label` to store 1
fn materialize(gen: &mut CodeGenerator, target: Reg, true_label: &str, end_label: &str) {
    gen.emit(LirInst::mov(Operand::int(0), target));
    gen.emit(LirInst::jump(end_label));
    gen.emit(LirInst::label(true_label));
    gen.emit(LirInst::mov(Operand::int(1), target));
    gen.emit(LirInst::label(end_label));
}

fn lower_short_circuit(
    gen: &mut CodeGenerator,
    op: BinaryOp,
    left: &Expression,
    right: &Expression,
) -> Result<Operand, CodegenError> {
    let labels = gen.labels.next_compare();
    let l = lower_expression(gen, left)?;
    let target = gen.load_owned(l)?;

    // `&&` stops on a false left operand, `||` on a true one
    let (stop_cond, stop_label) = match op {
        BinaryOp::LogicalAnd => (JumpCond::True, labels.false_label.clone()),
        _ => (JumpCond::False, labels.true_label.clone()),
    };

    gen.emit(LirInst::Compare {
        left: Operand::int(0),
        right: target,
    });
    gen.emit(LirInst::jump_if(stop_cond, stop_label.clone()));

    // Registers loaded on the right-hand path, including a cached `this`,
    // are not valid once the paths join.
    let checkpoint = gen.registers.checkpoint();
    let r = lower_expression(gen, right)?;
    let r = gen.load(r)?;
    gen.emit(LirInst::Compare {
        left: Operand::int(0),
        right: r,
    });
    gen.emit(LirInst::jump_if(stop_cond, stop_label));
    gen.registers.release_to(&checkpoint)?;

    match op {
        BinaryOp::LogicalAnd => {
            gen.emit(LirInst::mov(Operand::int(1), target));
            gen.emit(LirInst::jump(labels.end_label.clone()));
            gen.emit(LirInst::label(labels.false_label));
            gen.emit(LirInst::mov(Operand::int(0), target));
            gen.emit(LirInst::label(labels.end_label));
        }
        _ => materialize(gen, target, &labels.true_label, &labels.end_label),
    }
    Ok(Operand::Reg(target))
}

pub(super) fn lower_unary(gen: &mut CodeGenerator, op: UnaryOp, operand: &Expression) -> Result<Operand, CodegenError> {
    let value = lower_expression(gen, operand)?;
    let target = gen.load_owned(value)?;

    match op {
        UnaryOp::Neg => gen.emit(LirInst::Neg(target)),
        UnaryOp::Not => {
            let labels = gen.labels.next_compare();
            gen.emit(LirInst::Compare {
                left: Operand::int(0),
                right: target,
            });
            gen.emit(LirInst::jump_if(JumpCond::True, labels.true_label.clone()));
            materialize(gen, target, &labels.true_label, &labels.end_label);
        }
    }
    Ok(Operand::Reg(target))
}
