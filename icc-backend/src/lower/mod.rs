//! AST to LIR lowering
//!
//! One `CodeGenerator` walks the whole program. Statement and expression
//! lowering live in submodules as free functions taking the generator, the
//! same way for every node kind: lower the children, emit instructions into
//! the current method's buffer, and hand back the operand holding the result.
//!
//! Register discipline: every register a statement allocates is released when
//! the statement completes. Within a statement a register may be modified in
//! place only if this statement allocated it for a temporary; the register
//! caching `this` is shared and never written.

mod calls;
mod expressions;
mod operators;
mod program;
mod statements;

pub use program::generate_program;

use crate::error::CodegenError;
use crate::layout::LayoutManager;
use crate::naming::LabelGenerator;
use crate::strings::StringLiteralPool;
use crate::weights::WeightTable;
use crate::CodegenOptions;
use icc_codegen::{LirInst, Operand, Reg, RegisterPool};
use log::trace;

/// Tag of the register caching the `this` pointer
pub(crate) const THIS: &str = "this";

pub struct CodeGenerator<'a> {
    pub layouts: &'a LayoutManager,
    pub registers: RegisterPool,
    pub strings: StringLiteralPool,
    pub labels: LabelGenerator,
    pub options: CodegenOptions,
    /// Weights of the method being lowered
    weights: WeightTable,
    /// Class whose method is being lowered
    class_name: String,
    in_main: bool,
    /// Instructions of the method being lowered
    code: Vec<LirInst>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(layouts: &'a LayoutManager, options: CodegenOptions) -> Self {
        Self {
            layouts,
            registers: RegisterPool::new(options.register_count),
            strings: StringLiteralPool::new(),
            labels: LabelGenerator::new(),
            options,
            weights: WeightTable::default(),
            class_name: String::new(),
            in_main: false,
            code: Vec::new(),
        }
    }

    pub(crate) fn emit(&mut self, inst: LirInst) {
        trace!("  {}", inst);
        self.code.push(inst);
    }

    pub(crate) fn temp(&mut self) -> Result<Reg, CodegenError> {
        Ok(self.registers.allocate()?)
    }

    /// Register holding `this`, loading it on first use in the statement
    pub(crate) fn this_reg(&mut self) -> Result<Reg, CodegenError> {
        if let Some(reg) = self.registers.lookup(THIS) {
            return Ok(reg);
        }
        let reg = self.registers.allocate_for(THIS)?;
        self.emit(LirInst::mov(Operand::memory(THIS), reg));
        Ok(reg)
    }

    pub(crate) fn is_this_reg(&self, reg: Reg) -> bool {
        self.registers.tag_of(reg) == Some(THIS)
    }

    /// Operand in a register, reusing it if it already is one
    pub(crate) fn load(&mut self, op: Operand) -> Result<Reg, CodegenError> {
        match op {
            Operand::Reg(reg) => Ok(reg),
            other => self.copy_to_temp(other),
        }
    }

    /// Operand in a register this statement may overwrite
    pub(crate) fn load_owned(&mut self, op: Operand) -> Result<Reg, CodegenError> {
        match op {
            Operand::Reg(reg) if !self.is_this_reg(reg) => Ok(reg),
            other => self.copy_to_temp(other),
        }
    }

    fn copy_to_temp(&mut self, op: Operand) -> Result<Reg, CodegenError> {
        let reg = self.temp()?;
        self.emit(LirInst::mov(op, reg));
        Ok(reg)
    }

    /// Operand usable as an instruction source: heap cells are read into a
    /// register, everything else is used as is
    pub(crate) fn value(&mut self, op: Operand) -> Result<Operand, CodegenError> {
        if op.is_heap_cell() {
            Ok(Operand::Reg(self.copy_to_temp(op)?))
        } else {
            Ok(op)
        }
    }

    /// Operand that may be stored into memory or a heap cell: a register or
    /// an integer immediate. Labels and memory go through a register.
    pub(crate) fn store_source(&mut self, op: Operand) -> Result<Operand, CodegenError> {
        match op {
            Operand::Reg(_) => Ok(op),
            Operand::Literal(_) if op.literal_value().is_some() => Ok(op),
            other => Ok(Operand::Reg(self.copy_to_temp(other)?)),
        }
    }
}

#[cfg(test)]
mod tests;
