//! Expression lowering: literals, locations, allocation and `length`

use super::{calls, operators, CodeGenerator};
use crate::error::CodegenError;
use crate::layout::dispatch_label;
use crate::runtime::RuntimeCheck;
use icc_ast::{Expression, ExpressionKind, Literal, Location};
use icc_codegen::{ArithOp, LirInst, Operand, Reg};
use icc_common::WORD_SIZE;

pub(super) fn lower_expression(gen: &mut CodeGenerator, expr: &Expression) -> Result<Operand, CodegenError> {
    match &expr.kind {
        ExpressionKind::Literal(lit) => Ok(lower_literal(gen, lit)),

        ExpressionKind::Location(location) => lower_location(gen, location),

        ExpressionKind::StaticCall {
            class_name,
            name,
            arguments,
        } => calls::lower_static_call(gen, expr, class_name, name, arguments),

        ExpressionKind::VirtualCall {
            receiver,
            class_name,
            name,
            arguments,
        } => calls::lower_virtual_call(gen, expr, receiver.as_deref(), class_name, name, arguments),

        ExpressionKind::This => Ok(Operand::Reg(gen.this_reg()?)),

        ExpressionKind::NewClass { class_name } => lower_new_class(gen, class_name),

        ExpressionKind::NewArray { size, .. } => lower_new_array(gen, size),

        ExpressionKind::Length(array) => lower_length(gen, array),

        ExpressionKind::Binary { op, left, right } => operators::lower_binary(gen, expr, *op, left, right),

        ExpressionKind::Unary { op, operand } => operators::lower_unary(gen, *op, operand),
    }
}

fn lower_literal(gen: &mut CodeGenerator, lit: &Literal) -> Operand {
    match lit {
        Literal::Int(v) => Operand::int(*v),
        Literal::Bool(b) => Operand::int(i64::from(*b)),
        Literal::Null => Operand::int(0),
        Literal::Str(text) => Operand::Literal(gen.strings.intern(text)),
    }
}

/// Lower a location to the operand that reads or writes it
pub(super) fn lower_location(gen: &mut CodeGenerator, location: &Location) -> Result<Operand, CodegenError> {
    match location {
        Location::Local(name) => Ok(Operand::memory(name)),

        Location::Field {
            object,
            class_name,
            name,
        } => {
            let offset = gen.layouts.field_slot(class_name, name)?;
            let base = match object {
                Some(object) => object_reg(gen, object)?,
                None => gen.this_reg()?,
            };
            Ok(Operand::Field { base, offset })
        }

        Location::Array { array, index } => {
            let arr = lower_expression(gen, array)?;
            let base = gen.load(arr)?;

            let idx = lower_expression(gen, index)?;
            let idx = match idx {
                Operand::Literal(_) | Operand::Reg(_) => idx,
                other => Operand::Reg(gen.load(other)?),
            };

            gen.emit(RuntimeCheck::NullRef.call(vec![base.into()]));
            gen.emit(RuntimeCheck::ArrayAccess.call(vec![base.into(), idx.clone()]));
            Ok(Operand::ArrayCell {
                base,
                index: Box::new(idx),
            })
        }
    }
}

/// Evaluate an object reference into a register and null-check it.
/// `this` is never null and is not checked.
pub(super) fn object_reg(gen: &mut CodeGenerator, object: &Expression) -> Result<Reg, CodegenError> {
    let op = lower_expression(gen, object)?;
    let reg = gen.load(op)?;
    if !gen.is_this_reg(reg) {
        if let Some(class) = object.expr_type.class_name() {
            gen.registers.bind(reg, &dispatch_label(class))?;
        }
        gen.emit(RuntimeCheck::NullRef.call(vec![reg.into()]));
    }
    Ok(reg)
}

fn lower_new_class(gen: &mut CodeGenerator, class_name: &str) -> Result<Operand, CodegenError> {
    let layout = gen.layouts.get(class_name)?;
    let size = layout.size_in_bytes();
    let dv = layout.dispatch_label();

    let reg = gen.registers.allocate_for(&dv)?;
    gen.emit(LirInst::Library {
        func: "__allocateObject".to_string(),
        args: vec![Operand::int(size as i64)],
        dst: Some(reg),
    });
    gen.emit(LirInst::mov(Operand::Literal(dv), Operand::Field { base: reg, offset: 0 }));
    Ok(Operand::Reg(reg))
}

fn lower_new_array(gen: &mut CodeGenerator, size: &Expression) -> Result<Operand, CodegenError> {
    let count = lower_expression(gen, size)?;
    let reg = gen.load_owned(count)?;
    gen.emit(RuntimeCheck::Size.call(vec![reg.into()]));
    gen.emit(LirInst::Arith {
        op: ArithOp::Mul,
        src: Operand::int(WORD_SIZE as i64),
        dst: reg,
    });
    gen.emit(LirInst::Library {
        func: "__allocateArray".to_string(),
        args: vec![reg.into()],
        dst: Some(reg),
    });
    Ok(Operand::Reg(reg))
}

fn lower_length(gen: &mut CodeGenerator, array: &Expression) -> Result<Operand, CodegenError> {
    let arr = lower_expression(gen, array)?;
    let reg = gen.load_owned(arr)?;
    gen.emit(RuntimeCheck::NullRef.call(vec![reg.into()]));
    gen.emit(LirInst::ArrayLength { array: reg, dst: reg });
    Ok(Operand::Reg(reg))
}
