//! Call lowering
//!
//! Arguments are lowered left to right before the call itself. Each one is
//! passed as a register, an immediate or a memory variable; field and array
//! reads are loaded into a register first. Results of void calls go to
//! `Rdummy` and are never read.

use super::expressions::{lower_expression, object_reg};
use super::CodeGenerator;
use crate::error::CodegenError;
use icc_ast::{Expression, ExpressionKind};
use icc_codegen::{LirInst, Operand, Reg};
use icc_common::LIBRARY_CLASS;
use log::debug;

fn lower_arguments(gen: &mut CodeGenerator, arguments: &[Expression]) -> Result<Vec<Operand>, CodegenError> {
    let mut ops = Vec::with_capacity(arguments.len());
    for arg in arguments {
        let op = lower_expression(gen, arg)?;
        ops.push(gen.value(op)?);
    }
    Ok(ops)
}

/// Register receiving the call result, `None` for void calls
fn result_reg(gen: &mut CodeGenerator, call: &Expression) -> Result<Option<Reg>, CodegenError> {
    if call.expr_type.is_void() {
        Ok(None)
    } else {
        Ok(Some(gen.temp()?))
    }
}

fn call_result(dst: Option<Reg>) -> Operand {
    match dst {
        Some(reg) => Operand::Reg(reg),
        // never read; the type checker rejects uses of void values
        None => Operand::int(0),
    }
}

pub(super) fn lower_static_call(
    gen: &mut CodeGenerator,
    call: &Expression,
    class_name: &str,
    name: &str,
    arguments: &[Expression],
) -> Result<Operand, CodegenError> {
    let args = lower_arguments(gen, arguments)?;

    if class_name == LIBRARY_CLASS {
        let dst = result_reg(gen, call)?;
        gen.emit(LirInst::Library {
            func: format!("__{}", name),
            args,
            dst,
        });
        return Ok(call_result(dst));
    }

    let layouts = gen.layouts;
    let method = layouts.static_method(class_name, name)?;
    let dst = result_reg(gen, call)?;
    gen.emit(LirInst::StaticCall {
        func: format!("_{}", name),
        args: method.formals.iter().cloned().zip(args).collect(),
        dst,
    });
    Ok(call_result(dst))
}

pub(super) fn lower_virtual_call(
    gen: &mut CodeGenerator,
    call: &Expression,
    receiver: Option<&Expression>,
    class_name: &str,
    name: &str,
    arguments: &[Expression],
) -> Result<Operand, CodegenError> {
    let layouts = gen.layouts;
    let (slot, method) = layouts.virtual_method(class_name, name)?;
    debug!("virtual call {}.{} through slot {}", class_name, name, slot);

    let args = lower_arguments(gen, arguments)?;

    let object = match receiver {
        Some(expr) if !matches!(expr.kind, ExpressionKind::This) => object_reg(gen, expr)?,
        _ => gen.this_reg()?,
    };

    let dst = result_reg(gen, call)?;
    gen.emit(LirInst::VirtualCall {
        object,
        slot,
        args: method.formals.iter().cloned().zip(args).collect(),
        dst,
    });
    Ok(call_result(dst))
}
