//! Statement lowering

use super::expressions::{lower_expression, lower_location};
use super::CodeGenerator;
use crate::error::CodegenError;
use crate::runtime::{ERROR_EXIT, NO_VALUE};
use icc_ast::{Expression, ExpressionKind, Statement, StatementKind};
use icc_codegen::{JumpCond, LirInst, Operand};
use log::trace;

/// Lower a statement list, dropping everything after a statement that
/// never falls through
pub(super) fn lower_block(gen: &mut CodeGenerator, statements: &[Statement]) -> Result<(), CodegenError> {
    for stmt in statements {
        lower_statement(gen, stmt)?;
        if stmt.transfers_control() {
            break;
        }
    }
    Ok(())
}

pub(super) fn lower_statement(gen: &mut CodeGenerator, stmt: &Statement) -> Result<(), CodegenError> {
    if gen.options.annotate {
        gen.emit(LirInst::Comment(format!(
            "line {}: {}",
            stmt.span.line_number(),
            stmt.kind_name()
        )));
    }

    let checkpoint = gen.registers.checkpoint();
    match &stmt.kind {
        StatementKind::Assignment { target, value } => lower_assignment(gen, target, value)?,

        StatementKind::Call(call) => {
            lower_expression(gen, call)?;
        }

        StatementKind::Return(value) => lower_return(gen, value.as_ref())?,

        StatementKind::If {
            condition,
            then_stmt,
            else_stmt,
        } => lower_if(gen, condition, then_stmt, else_stmt.as_deref())?,

        StatementKind::While { condition, body } => lower_while(gen, condition, body)?,

        StatementKind::Break => {
            let target = gen.labels.current_loop().map(|l| l.end_label.clone());
            let label = target.ok_or_else(|| CodegenError::LoopControlOutsideLoop {
                statement: "break",
                location: stmt.span.start.clone(),
            })?;
            gen.emit(LirInst::jump(label));
        }

        StatementKind::Continue => {
            let target = gen.labels.current_loop().map(|l| l.test_label.clone());
            let label = target.ok_or_else(|| CodegenError::LoopControlOutsideLoop {
                statement: "continue",
                location: stmt.span.start.clone(),
            })?;
            gen.emit(LirInst::jump(label));
        }

        StatementKind::Block(statements) => lower_block(gen, statements)?,

        StatementKind::LocalVariable { name, init, .. } => {
            if let Some(init) = init {
                let value = lower_expression(gen, init)?;
                let value = gen.store_source(value)?;
                gen.emit(LirInst::mov(value, Operand::memory(name)));
            }
        }
    }
    gen.registers.release_to(&checkpoint)?;
    trace!("after {}: [{}]", stmt.kind_name(), gen.registers.dump());
    Ok(())
}

/// The value is evaluated before the location it is stored into
fn lower_assignment(gen: &mut CodeGenerator, target: &Expression, value: &Expression) -> Result<(), CodegenError> {
    let value = lower_expression(gen, value)?;
    let value = gen.store_source(value)?;

    let location = match &target.kind {
        ExpressionKind::Location(location) => lower_location(gen, location)?,
        _ => {
            return Err(CodegenError::InvalidAssignmentTarget {
                location: target.span.start.clone(),
            })
        }
    };

    gen.emit(LirInst::mov(value, location));
    Ok(())
}

fn lower_return(gen: &mut CodeGenerator, value: Option<&Expression>) -> Result<(), CodegenError> {
    if gen.in_main {
        // leaving main ends the program
        gen.emit(LirInst::jump(ERROR_EXIT));
        return Ok(());
    }

    let result = match value {
        Some(value) => {
            let op = lower_expression(gen, value)?;
            gen.value(op)?
        }
        None => Operand::int(NO_VALUE),
    };
    gen.emit(LirInst::Return(result));
    Ok(())
}

/// Evaluate a condition into a register and jump to `label` when it is false
fn branch_if_false(gen: &mut CodeGenerator, condition: &Expression, label: &str) -> Result<(), CodegenError> {
    let checkpoint = gen.registers.checkpoint();
    let cond = lower_expression(gen, condition)?;
    let reg = gen.load(cond)?;
    gen.emit(LirInst::Compare {
        left: Operand::int(0),
        right: reg,
    });
    gen.emit(LirInst::jump_if(JumpCond::True, label));
    gen.registers.release_to(&checkpoint)?;
    Ok(())
}

fn lower_if(
    gen: &mut CodeGenerator,
    condition: &Expression,
    then_stmt: &Statement,
    else_stmt: Option<&Statement>,
) -> Result<(), CodegenError> {
    let labels = gen.labels.next_if();

    match else_stmt {
        Some(else_stmt) => {
            branch_if_false(gen, condition, &labels.false_label)?;
            lower_statement(gen, then_stmt)?;
            gen.emit(LirInst::jump(labels.end_label.clone()));
            gen.emit(LirInst::label(labels.false_label));
            lower_statement(gen, else_stmt)?;
        }
        None => {
            branch_if_false(gen, condition, &labels.end_label)?;
            lower_statement(gen, then_stmt)?;
        }
    }

    gen.emit(LirInst::label(labels.end_label));
    Ok(())
}

fn lower_while(gen: &mut CodeGenerator, condition: &Expression, body: &Statement) -> Result<(), CodegenError> {
    let labels = gen.labels.next_while();

    gen.emit(LirInst::label(labels.test_label.clone()));
    branch_if_false(gen, condition, &labels.end_label)?;

    gen.labels.enter_loop(labels.clone());
    let result = lower_statement(gen, body);
    gen.labels.exit_loop();
    result?;

    gen.emit(LirInst::jump(labels.test_label));
    gen.emit(LirInst::label(labels.end_label));
    Ok(())
}
