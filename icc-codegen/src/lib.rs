//! IC Compiler - LIR Code Generation Primitives
//!
//! This crate holds the target side of the backend:
//!
//! - LIR operand and instruction definitions with their text rendering
//! - The symbolic register pool

pub mod lir;
pub mod regalloc;

pub use lir::{render_instructions, ArithOp, JumpCond, LirInst, Operand, Reg, DUMMY_REG};
pub use regalloc::{PoolCheckpoint, RegAllocError, RegisterPool, DEFAULT_REGISTER_COUNT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_registers_render_as_operands() {
        let mut pool = RegisterPool::default();
        let obj = pool.allocate_for("_DV_Point").unwrap();
        let code = vec![
            LirInst::Library {
                func: "__allocateObject".to_string(),
                args: vec![Operand::int(12)],
                dst: Some(obj),
            },
            LirInst::mov(
                Operand::Literal("_DV_Point".to_string()),
                Operand::Field { base: obj, offset: 0 },
            ),
        ];

        assert_eq!(
            render_instructions(&code),
            "Library __allocateObject(12), R1\nMoveField _DV_Point, R1.0\n"
        );
    }
}
