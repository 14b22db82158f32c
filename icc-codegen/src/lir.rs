//! microLIR Instruction Definitions
//!
//! This module defines the operand model and the instruction set of the LIR
//! text consumed by the emulator. Instructions print themselves in LIR syntax
//! through `Display`, so the generator only builds values and never formats
//! instruction text by hand.

use std::fmt;

/// Symbolic LIR register `R<n>`, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(pub u32);

impl Reg {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Name of the register that discards a call result
pub const DUMMY_REG: &str = "Rdummy";

/// Value produced by lowering an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    /// Immediate: integer, `0`/`1` for booleans and null, or a string label
    Literal(String),
    /// Named memory variable (locals, formals, `this`)
    Memory(String),
    /// `R.k`, word `k` of the object in `base`
    Field { base: Reg, offset: usize },
    /// `R[i]`; the index is a register or an immediate
    ArrayCell { base: Reg, index: Box<Operand> },
}

impl Operand {
    pub fn int(value: i64) -> Self {
        Operand::Literal(value.to_string())
    }

    pub fn memory(name: &str) -> Self {
        Operand::Memory(name.to_string())
    }

    /// Field and array cells need a register round trip before most uses
    pub fn is_heap_cell(&self) -> bool {
        matches!(self, Operand::Field { .. } | Operand::ArrayCell { .. })
    }

    /// Integer value of an immediate operand
    pub fn literal_value(&self) -> Option<i64> {
        match self {
            Operand::Literal(text) => text.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Literal(text) => write!(f, "{}", text),
            Operand::Memory(name) => write!(f, "{}", name),
            Operand::Field { base, offset } => write!(f, "{}.{}", base, offset),
            Operand::ArrayCell { base, index } => write!(f, "{}[{}]", base, index),
        }
    }
}

impl From<Reg> for Operand {
    fn from(reg: Reg) -> Self {
        Operand::Reg(reg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "Add"),
            ArithOp::Sub => write!(f, "Sub"),
            ArithOp::Mul => write!(f, "Mul"),
            ArithOp::Div => write!(f, "Div"),
            ArithOp::Mod => write!(f, "Mod"),
        }
    }
}

/// Jump condition, tested against the flags set by the last `Compare`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpCond {
    Always,
    True,
    False,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl fmt::Display for JumpCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpCond::Always => write!(f, "Jump"),
            JumpCond::True => write!(f, "JumpTrue"),
            JumpCond::False => write!(f, "JumpFalse"),
            JumpCond::Greater => write!(f, "JumpG"),
            JumpCond::GreaterEqual => write!(f, "JumpGE"),
            JumpCond::Less => write!(f, "JumpL"),
            JumpCond::LessEqual => write!(f, "JumpLE"),
        }
    }
}

/// LIR Instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LirInst {
    Label(String),
    Comment(String),

    /// Data move; prints as `Move`, `MoveField` or `MoveArray` depending on
    /// which side addresses the heap
    Move { src: Operand, dst: Operand },

    Arith { op: ArithOp, src: Operand, dst: Reg },
    Inc(Reg),
    Dec(Reg),
    Neg(Reg),

    /// `Compare left, right` sets the flags from `right - left`
    Compare { left: Operand, right: Reg },
    Jump { cond: JumpCond, label: String },

    /// `StaticCall _f(x=..), dst`; a `None` destination prints `Rdummy`
    StaticCall {
        func: String,
        args: Vec<(String, Operand)>,
        dst: Option<Reg>,
    },
    /// `VirtualCall R.slot(x=..), dst`
    VirtualCall {
        object: Reg,
        slot: usize,
        args: Vec<(String, Operand)>,
        dst: Option<Reg>,
    },
    /// `Library __f(..), dst` with positional arguments
    Library {
        func: String,
        args: Vec<Operand>,
        dst: Option<Reg>,
    },

    ArrayLength { array: Reg, dst: Reg },
    Return(Operand),
}

impl LirInst {
    pub fn mov(src: impl Into<Operand>, dst: impl Into<Operand>) -> Self {
        LirInst::Move {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn jump(label: impl Into<String>) -> Self {
        LirInst::Jump {
            cond: JumpCond::Always,
            label: label.into(),
        }
    }

    pub fn jump_if(cond: JumpCond, label: impl Into<String>) -> Self {
        LirInst::Jump {
            cond,
            label: label.into(),
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        LirInst::Label(name.into())
    }

    fn move_mnemonic(src: &Operand, dst: &Operand) -> &'static str {
        let is_field = |o: &Operand| matches!(o, Operand::Field { .. });
        let is_cell = |o: &Operand| matches!(o, Operand::ArrayCell { .. });
        if is_field(src) || is_field(dst) {
            "MoveField"
        } else if is_cell(src) || is_cell(dst) {
            "MoveArray"
        } else {
            "Move"
        }
    }
}

struct Dest<'a>(&'a Option<Reg>);

impl fmt::Display for Dest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(reg) => write!(f, "{}", reg),
            None => write!(f, "{}", DUMMY_REG),
        }
    }
}

fn write_named_args(f: &mut fmt::Formatter<'_>, args: &[(String, Operand)]) -> fmt::Result {
    for (i, (name, value)) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", name, value)?;
    }
    Ok(())
}

impl fmt::Display for LirInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LirInst::Label(name) => write!(f, "{}:", name),
            LirInst::Comment(text) => write!(f, "# {}", text),

            LirInst::Move { src, dst } => {
                write!(f, "{} {}, {}", Self::move_mnemonic(src, dst), src, dst)
            }

            LirInst::Arith { op, src, dst } => write!(f, "{} {}, {}", op, src, dst),
            LirInst::Inc(r) => write!(f, "Inc {}", r),
            LirInst::Dec(r) => write!(f, "Dec {}", r),
            LirInst::Neg(r) => write!(f, "Neg {}", r),

            LirInst::Compare { left, right } => write!(f, "Compare {}, {}", left, right),
            LirInst::Jump { cond, label } => write!(f, "{} {}", cond, label),

            LirInst::StaticCall { func, args, dst } => {
                write!(f, "StaticCall {}(", func)?;
                write_named_args(f, args)?;
                write!(f, "), {}", Dest(dst))
            }
            LirInst::VirtualCall {
                object,
                slot,
                args,
                dst,
            } => {
                write!(f, "VirtualCall {}.{}(", object, slot)?;
                write_named_args(f, args)?;
                write!(f, "), {}", Dest(dst))
            }
            LirInst::Library { func, args, dst } => {
                write!(f, "Library {}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "), {}", Dest(dst))
            }

            LirInst::ArrayLength { array, dst } => write!(f, "ArrayLength {}, {}", array, dst),
            LirInst::Return(value) => write!(f, "Return {}", value),
        }
    }
}

/// Render a sequence of instructions, one per line
pub fn render_instructions(instructions: &[LirInst]) -> String {
    let mut out = String::new();
    for inst in instructions {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_display() {
        assert_eq!(Reg(1).to_string(), "R1");
        assert_eq!(Reg(42).to_string(), "R42");
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(Operand::Field { base: Reg(3), offset: 2 }.to_string(), "R3.2");
        let cell = Operand::ArrayCell {
            base: Reg(1),
            index: Box::new(Operand::Reg(Reg(2))),
        };
        assert_eq!(cell.to_string(), "R1[R2]");
        let imm = Operand::ArrayCell {
            base: Reg(1),
            index: Box::new(Operand::int(4)),
        };
        assert_eq!(imm.to_string(), "R1[4]");
    }

    #[test]
    fn test_move_variant_follows_heap_side() {
        let field = Operand::Field { base: Reg(2), offset: 0 };
        assert_eq!(
            LirInst::mov(Operand::Literal("_DV_Point".into()), field.clone()).to_string(),
            "MoveField _DV_Point, R2.0"
        );
        assert_eq!(LirInst::mov(field, Reg(4)).to_string(), "MoveField R2.0, R4");

        let cell = Operand::ArrayCell {
            base: Reg(1),
            index: Box::new(Operand::int(0)),
        };
        assert_eq!(LirInst::mov(Reg(5), cell).to_string(), "MoveArray R5, R1[0]");
        assert_eq!(LirInst::mov(Operand::memory("x"), Reg(1)).to_string(), "Move x, R1");
    }

    #[test]
    fn test_call_display() {
        let call = LirInst::StaticCall {
            func: "__checkArrayAccess".into(),
            args: vec![("a".into(), Operand::Reg(Reg(1))), ("i".into(), Operand::int(3))],
            dst: None,
        };
        assert_eq!(call.to_string(), "StaticCall __checkArrayAccess(a=R1, i=3), Rdummy");

        let vcall = LirInst::VirtualCall {
            object: Reg(2),
            slot: 1,
            args: vec![],
            dst: Some(Reg(3)),
        };
        assert_eq!(vcall.to_string(), "VirtualCall R2.1(), R3");

        let lib = LirInst::Library {
            func: "__allocateObject".into(),
            args: vec![Operand::int(12)],
            dst: Some(Reg(1)),
        };
        assert_eq!(lib.to_string(), "Library __allocateObject(12), R1");
    }

    #[test]
    fn test_control_display() {
        assert_eq!(LirInst::jump("_error_exit").to_string(), "Jump _error_exit");
        assert_eq!(
            LirInst::jump_if(JumpCond::GreaterEqual, "x").to_string(),
            "JumpGE x"
        );
        assert_eq!(
            LirInst::Compare { left: Operand::int(0), right: Reg(1) }.to_string(),
            "Compare 0, R1"
        );
        assert_eq!(LirInst::label("_ic_main").to_string(), "_ic_main:");
        assert_eq!(LirInst::Comment("line 3: If".into()).to_string(), "# line 3: If");
    }

    #[test]
    fn test_render_instructions() {
        let text = render_instructions(&[LirInst::Inc(Reg(1)), LirInst::Return(Operand::int(9999))]);
        assert_eq!(text, "Inc R1\nReturn 9999\n");
    }

    #[test]
    fn test_literal_value() {
        assert_eq!(Operand::int(-7).literal_value(), Some(-7));
        assert_eq!(Operand::Literal("str1".into()).literal_value(), None);
        assert_eq!(Operand::memory("x").literal_value(), None);
    }
}
