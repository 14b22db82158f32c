use super::*;
use crate::error::CodegenError;
use icc_ast::AstBuilder;
use pretty_assertions::assert_eq;

#[test]
fn test_if_else_labels() {
    let mut b = AstBuilder::new();
    let c = b.local("c", Type::Bool);
    let x = b.local("x", Type::Int);
    let one = b.int(1);
    let then_stmt = b.assign(x, one);
    let x = b.local("x", Type::Int);
    let two = b.int(2);
    let else_stmt = b.assign(x, two);
    let stmt = b.if_stmt(c, then_stmt, Some(else_stmt));

    assert_eq!(
        compile_main(vec![stmt]),
        "Move c, R1\n\
         Compare 0, R1\n\
         JumpTrue _if_false_label_1\n\
         Move 1, x\n\
         Jump _if_end_label_1\n\
         _if_false_label_1:\n\
         Move 2, x\n\
         _if_end_label_1:\n"
    );
}

#[test]
fn test_if_without_else_jumps_to_end() {
    let mut b = AstBuilder::new();
    let c = b.local("c", Type::Bool);
    let x = b.local("x", Type::Int);
    let one = b.int(1);
    let then_stmt = b.assign(x, one);
    let stmt = b.if_stmt(c, then_stmt, None);

    let body = compile_main(vec![stmt]);
    assert!(body.contains("JumpTrue _if_end_label_1\n"));
    assert!(!body.contains("_if_false_label_1"));
}

#[test]
fn test_break_and_continue_targets() {
    let mut b = AstBuilder::new();
    let cond = b.boolean(true);
    let flag = b.local("flag", Type::Bool);
    let cont = b.continue_stmt();
    let skip = b.if_stmt(flag, cont, None);
    let brk = b.break_stmt();
    let body = b.block(vec![skip, brk]);
    let stmt = b.while_stmt(cond, body);

    assert_eq!(
        compile_main(vec![stmt]),
        "_while_test_label_1:\n\
         Move 1, R1\n\
         Compare 0, R1\n\
         JumpTrue _while_end_label_1\n\
         Move flag, R1\n\
         Compare 0, R1\n\
         JumpTrue _if_end_label_1\n\
         Jump _while_test_label_1\n\
         _if_end_label_1:\n\
         Jump _while_end_label_1\n\
         Jump _while_test_label_1\n\
         _while_end_label_1:\n"
    );
}

#[test]
fn test_break_leaves_innermost_loop() {
    let mut b = AstBuilder::new();
    let outer_cond = b.local("a", Type::Bool);
    let inner_cond = b.local("b", Type::Bool);
    let brk = b.break_stmt();
    let inner_body = b.block(vec![brk]);
    let inner = b.while_stmt(inner_cond, inner_body);
    let cont = b.continue_stmt();
    let outer_body = b.block(vec![inner, cont]);
    let outer = b.while_stmt(outer_cond, outer_body);

    assert_eq!(
        compile_main(vec![outer]),
        "_while_test_label_1:\n\
         Move a, R1\n\
         Compare 0, R1\n\
         JumpTrue _while_end_label_1\n\
         _while_test_label_2:\n\
         Move b, R1\n\
         Compare 0, R1\n\
         JumpTrue _while_end_label_2\n\
         Jump _while_end_label_2\n\
         Jump _while_test_label_2\n\
         _while_end_label_2:\n\
         Jump _while_test_label_1\n\
         Jump _while_test_label_1\n\
         _while_end_label_1:\n"
    );
}

#[test]
fn test_break_outside_loop_is_an_error() {
    let mut b = AstBuilder::new();
    b.at_line(7);
    let brk = b.break_stmt();
    let program = Program {
        classes: vec![main_class(vec![brk])],
    };

    match generate_program(&program, &CodegenOptions::default()) {
        Err(CodegenError::LoopControlOutsideLoop { statement, location }) => {
            assert_eq!(statement, "break");
            assert_eq!(location.line, 7);
        }
        other => panic!("expected loop control error, got {:?}", other),
    }
}

#[test]
fn test_return_in_main_exits_and_prunes_rest() {
    let mut b = AstBuilder::new();
    let ret = b.ret(None);
    let x = b.local("x", Type::Int);
    let one = b.int(1);
    let dead = b.assign(x, one);

    assert_eq!(compile_main(vec![ret, dead]), "Jump _error_exit\n");
}

#[test]
fn test_void_method_always_ends_with_return() {
    let mut b = AstBuilder::new();
    let ret = b.ret(None);
    let early = MethodDecl::new("early", MethodKind::Virtual, vec![], Type::Void, vec![ret]);
    let empty = MethodDecl::new("empty", MethodKind::Virtual, vec![], Type::Void, vec![]);
    let class = ClassDecl::new("A", None).with_method(early).with_method(empty);

    let lir = compile(&Program {
        classes: vec![class, main_class(vec![])],
    });
    assert!(lir.contains("\n_A_early:\nReturn 9999\nReturn 9999\n"));
    assert!(lir.contains("\n_A_empty:\nReturn 9999\n"));
}

#[test]
fn test_annotations_name_line_and_statement() {
    let mut b = AstBuilder::new();
    b.at_line(4);
    let one = b.int(1);
    let decl = b.local_var("x", Type::Int, Some(one));
    b.at_line(5);
    let ret = b.ret(None);

    let program = Program {
        classes: vec![main_class(vec![decl, ret])],
    };
    let options = CodegenOptions {
        annotate: true,
        ..CodegenOptions::default()
    };
    let lir = generate_program(&program, &options).unwrap();
    assert_eq!(
        main_body(&lir),
        "# line 4: LocalVariable\n\
         Move 1, x\n\
         # line 5: Return\n\
         Jump _error_exit\n"
    );
}
