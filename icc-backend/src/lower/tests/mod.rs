//! Lowering tests over small hand-built programs

mod control_flow_tests;
mod program_tests;

use crate::{generate_program, CodegenOptions};
use icc_ast::{ClassDecl, Formal, MethodDecl, MethodKind, Program, Statement};
use icc_common::Type;

fn main_method(body: Vec<Statement>) -> MethodDecl {
    MethodDecl::new(
        "main",
        MethodKind::Static,
        vec![Formal::new("args", Type::array_of(Type::String))],
        Type::Void,
        body,
    )
}

fn main_class(body: Vec<Statement>) -> ClassDecl {
    ClassDecl::new("Main", None).with_method(main_method(body))
}

fn compile(program: &Program) -> String {
    generate_program(program, &CodegenOptions::default()).unwrap()
}

/// Code between `_ic_main:` and the exit label
fn main_body(lir: &str) -> String {
    let start = lir.find("_ic_main:\n").unwrap() + "_ic_main:\n".len();
    let end = lir.rfind("_error_exit:\n").unwrap();
    lir[start..end].to_string()
}

/// Compile a program made of `classes` plus a `Main` class holding `body`
fn compile_main_with(classes: Vec<ClassDecl>, body: Vec<Statement>) -> String {
    let mut classes = classes;
    classes.push(main_class(body));
    main_body(&compile(&Program { classes }))
}

fn compile_main(body: Vec<Statement>) -> String {
    compile_main_with(vec![], body)
}
