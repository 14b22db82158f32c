use super::*;
use crate::error::CodegenError;
use icc_ast::{AstBuilder, BinaryOp};
use icc_codegen::RegAllocError;
use pretty_assertions::assert_eq;

fn void_method(name: &str) -> MethodDecl {
    MethodDecl::new(name, MethodKind::Virtual, vec![], Type::Void, vec![])
}

fn library() -> ClassDecl {
    let println = MethodDecl::new(
        "println",
        MethodKind::Library,
        vec![Formal::new("s", Type::String)],
        Type::Void,
        vec![],
    );
    ClassDecl::new("Library", None).with_method(println)
}

#[test]
fn test_section_order() {
    let mut b = AstBuilder::new();
    let hello = b.string("hello");
    let call = b.library_call("println", vec![hello], Type::Void);
    let stmt = b.call_stmt(call);
    let class = ClassDecl::new("A", None).with_method(void_method("m"));

    let lir = compile(&Program {
        classes: vec![library(), class, main_class(vec![stmt])],
    });

    let positions: Vec<usize> = [
        "str_null_ref:",
        "str1: \"hello\"",
        "_DV_A: [_A_m]",
        "# Runtime checks:",
        "_A_m:",
        "# main in Main",
        "_error_exit:\n",
    ]
    .iter()
    .map(|needle| lir.find(needle).unwrap())
    .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    assert!(lir.starts_with("str_null_ref:"));
    assert!(lir.ends_with("Library __println(str1), Rdummy\n_error_exit:\n"));
}

#[test]
fn test_library_class_is_not_emitted() {
    let lir = compile(&Program {
        classes: vec![library(), main_class(vec![])],
    });
    assert!(!lir.contains("_DV_Library"));
    assert!(!lir.contains("_println:"));
    assert!(lir.contains("_DV_Main: []\n"));
}

#[test]
fn test_override_keeps_inherited_slot() {
    let a = ClassDecl::new("A", None)
        .with_method(void_method("m"))
        .with_method(void_method("n"));
    let b = ClassDecl::new("B", Some("A")).with_method(void_method("m"));

    // subclass declared before its superclass
    let lir = compile(&Program {
        classes: vec![b, a, main_class(vec![])],
    });
    assert!(lir.contains("_DV_A: [_A_m, _A_n]\n_DV_Main: []\n_DV_B: [_B_m, _A_n]\n"));
    assert!(lir.contains("\n_B_m:\nReturn 9999\n"));
    assert!(lir.contains("\n_A_n:\nReturn 9999\n"));
}

#[test]
fn test_string_literals_are_interned_once() {
    let mut b = AstBuilder::new();
    let mut stmts = Vec::new();
    for text in ["hi", "hi", "bye"] {
        let s = b.string(text);
        let call = b.library_call("println", vec![s], Type::Void);
        stmts.push(b.call_stmt(call));
    }

    let lir = compile(&Program {
        classes: vec![library(), main_class(stmts)],
    });
    assert!(lir.contains("str_zero: \"Runtime Error: Division by zero!\"\nstr1: \"hi\"\nstr2: \"bye\"\n_DV_Main"));
    assert_eq!(
        main_body(&lir),
        "Library __println(str1), Rdummy\n\
         Library __println(str1), Rdummy\n\
         Library __println(str2), Rdummy\n"
    );
}

#[test]
fn test_library_call_result_goes_to_register() {
    let mut b = AstBuilder::new();
    let call = b.library_call("readi", vec![], Type::Int);
    let decl = b.local_var("n", Type::Int, Some(call));

    assert_eq!(compile_main(vec![decl]), "Library __readi(), R1\nMove R1, n\n");
}

#[test]
fn test_unresolved_superclass_is_an_error() {
    let orphan = ClassDecl::new("Orphan", Some("Missing"));
    let result = generate_program(
        &Program {
            classes: vec![orphan, main_class(vec![])],
        },
        &CodegenOptions::default(),
    );
    assert_eq!(
        result,
        Err(CodegenError::UnresolvedInheritance {
            classes: vec!["Orphan".to_string()],
        })
    );
}

#[test]
fn test_register_exhaustion_is_reported() {
    let mut b = AstBuilder::new();
    let seven = b.int(7);
    let ret = b.ret(Some(seven));
    let f = MethodDecl::new("f", MethodKind::Static, vec![], Type::Int, vec![ret]);

    let x = b.local("x", Type::Int);
    let call = b.static_call("Main", "f", vec![], Type::Int);
    let sum = b.binary(BinaryOp::Add, x, call);
    let decl = b.local_var("r", Type::Int, Some(sum));

    let options = CodegenOptions {
        register_count: 1,
        ..CodegenOptions::default()
    };
    let result = generate_program(
        &Program {
            classes: vec![main_class(vec![decl]).with_method(f)],
        },
        &options,
    );
    assert_eq!(
        result,
        Err(CodegenError::RegisterAllocation(RegAllocError::OutOfRegisters { capacity: 1 }))
    );
}

#[test]
fn test_registers_reset_between_statements() {
    let mut b = AstBuilder::new();
    let x = b.local("x", Type::Int);
    let neg = b.unary(icc_ast::UnaryOp::Neg, x);
    let first = b.local_var("y", Type::Int, Some(neg));
    let y = b.local("y", Type::Int);
    let neg = b.unary(icc_ast::UnaryOp::Neg, y);
    let second = b.local_var("z", Type::Int, Some(neg));

    assert_eq!(
        compile_main(vec![first, second]),
        "Move x, R1\nNeg R1\nMove R1, y\nMove y, R1\nNeg R1\nMove R1, z\n"
    );
}
