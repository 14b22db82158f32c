//! Runtime check routines
//!
//! Four guard routines are emitted once per program. Each tests its
//! arguments and either returns, or prints a fixed message and jumps to the
//! shared `_error_exit` label at the very end of the program.

use icc_codegen::{JumpCond, LirInst, Operand, Reg};

/// Label that ends the program; failed checks and `return` in `main` jump here
pub const ERROR_EXIT: &str = "_error_exit";

/// Value returned from routines that have no result
pub const NO_VALUE: i64 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeCheck {
    Zero,
    NullRef,
    ArrayAccess,
    Size,
}

impl RuntimeCheck {
    /// Emission order of the routines
    pub const ALL: [RuntimeCheck; 4] = [
        RuntimeCheck::Zero,
        RuntimeCheck::NullRef,
        RuntimeCheck::ArrayAccess,
        RuntimeCheck::Size,
    ];

    /// Emission order of the message table
    const MESSAGE_ORDER: [RuntimeCheck; 4] = [
        RuntimeCheck::NullRef,
        RuntimeCheck::ArrayAccess,
        RuntimeCheck::Size,
        RuntimeCheck::Zero,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuntimeCheck::Zero => "__checkZero",
            RuntimeCheck::NullRef => "__checkNullRef",
            RuntimeCheck::ArrayAccess => "__checkArrayAccess",
            RuntimeCheck::Size => "__checkSize",
        }
    }

    /// Failure path inside the routine
    pub fn error_label(&self) -> String {
        format!("{}_err", self.label())
    }

    fn formals(&self) -> &'static [&'static str] {
        match self {
            RuntimeCheck::Zero => &["b"],
            RuntimeCheck::NullRef => &["a"],
            RuntimeCheck::ArrayAccess => &["a", "i"],
            RuntimeCheck::Size => &["n"],
        }
    }

    fn message_label(&self) -> &'static str {
        match self {
            RuntimeCheck::Zero => "str_zero",
            RuntimeCheck::NullRef => "str_null_ref",
            RuntimeCheck::ArrayAccess => "str_array_access",
            RuntimeCheck::Size => "str_size",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            RuntimeCheck::Zero => "Runtime Error: Division by zero!",
            RuntimeCheck::NullRef => "Runtime Error: Null pointer dereference!",
            RuntimeCheck::ArrayAccess => "Runtime Error: Array index out of bounds!",
            RuntimeCheck::Size => "Runtime Error: Array allocation with negative array size!",
        }
    }

    /// Guard call passing `args` to the routine's formals in order
    pub fn call(&self, args: Vec<Operand>) -> LirInst {
        LirInst::StaticCall {
            func: self.label().to_string(),
            args: self
                .formals()
                .iter()
                .map(|f| f.to_string())
                .zip(args)
                .collect(),
            dst: None,
        }
    }

    /// Body of the routine, entry label included
    pub fn routine(&self) -> Vec<LirInst> {
        let r1 = Reg(1);
        let r2 = Reg(2);
        let err = self.error_label();
        let mut code = vec![LirInst::label(self.label())];

        match self {
            RuntimeCheck::Zero | RuntimeCheck::NullRef => {
                code.push(LirInst::mov(Operand::memory(self.formals()[0]), r1));
                code.push(LirInst::Compare { left: Operand::int(0), right: r1 });
                code.push(LirInst::jump_if(JumpCond::True, err.clone()));
            }
            RuntimeCheck::ArrayAccess => {
                code.push(LirInst::mov(Operand::memory("a"), r1));
                code.push(LirInst::mov(Operand::memory("i"), r2));
                code.push(LirInst::ArrayLength { array: r1, dst: r1 });
                code.push(LirInst::Compare { left: r1.into(), right: r2 });
                code.push(LirInst::jump_if(JumpCond::GreaterEqual, err.clone()));
                code.push(LirInst::Compare { left: Operand::int(0), right: r2 });
                code.push(LirInst::jump_if(JumpCond::Less, err.clone()));
            }
            RuntimeCheck::Size => {
                code.push(LirInst::mov(Operand::memory("n"), r1));
                code.push(LirInst::Compare { left: Operand::int(0), right: r1 });
                code.push(LirInst::jump_if(JumpCond::Less, err.clone()));
            }
        }

        code.push(LirInst::Return(Operand::int(NO_VALUE)));
        code.push(LirInst::label(err));
        code.push(LirInst::Library {
            func: "__println".to_string(),
            args: vec![Operand::Literal(self.message_label().to_string())],
            dst: None,
        });
        code.push(LirInst::jump(ERROR_EXIT));
        code
    }
}

/// The fixed `str_*` message table
pub fn render_messages() -> String {
    let mut out = String::new();
    for check in RuntimeCheck::MESSAGE_ORDER {
        out.push_str(&format!("{}: \"{}\"\n", check.message_label(), check.message()));
    }
    out
}

/// All four routines under a `# Runtime checks:` heading
pub fn render_routines() -> String {
    let bodies: Vec<String> = RuntimeCheck::ALL
        .iter()
        .map(|check| icc_codegen::render_instructions(&check.routine()))
        .collect();
    format!("\n# Runtime checks:\n{}", bodies.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_table() {
        assert_eq!(
            render_messages(),
            "str_null_ref: \"Runtime Error: Null pointer dereference!\"\n\
             str_array_access: \"Runtime Error: Array index out of bounds!\"\n\
             str_size: \"Runtime Error: Array allocation with negative array size!\"\n\
             str_zero: \"Runtime Error: Division by zero!\"\n"
        );
    }

    #[test]
    fn test_array_access_routine() {
        let text = icc_codegen::render_instructions(&RuntimeCheck::ArrayAccess.routine());
        assert_eq!(
            text,
            "__checkArrayAccess:\n\
             Move a, R1\n\
             Move i, R2\n\
             ArrayLength R1, R1\n\
             Compare R1, R2\n\
             JumpGE __checkArrayAccess_err\n\
             Compare 0, R2\n\
             JumpL __checkArrayAccess_err\n\
             Return 9999\n\
             __checkArrayAccess_err:\n\
             Library __println(str_array_access), Rdummy\n\
             Jump _error_exit\n"
        );
    }

    #[test]
    fn test_guard_call_names_formals() {
        let call = RuntimeCheck::ArrayAccess.call(vec![Operand::Reg(Reg(3)), Operand::int(2)]);
        assert_eq!(call.to_string(), "StaticCall __checkArrayAccess(a=R3, i=2), Rdummy");
        let zero = RuntimeCheck::Zero.call(vec![Operand::memory("d")]);
        assert_eq!(zero.to_string(), "StaticCall __checkZero(b=d), Rdummy");
    }

    #[test]
    fn test_routines_section() {
        let text = render_routines();
        assert!(text.starts_with("\n# Runtime checks:\n__checkZero:\nMove b, R1\n"));
        assert!(text.contains("Return 9999\n__checkZero_err:\n"));
        assert!(text.contains("Jump _error_exit\n\n__checkNullRef:\n"));
        assert!(text.ends_with("Library __println(str_size), Rdummy\nJump _error_exit\n"));
    }
}
