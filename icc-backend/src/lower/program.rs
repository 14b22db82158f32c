//! Program and method lowering, and assembly of the final LIR text

use super::statements::lower_block;
use super::CodeGenerator;
use crate::error::CodegenError;
use crate::layout::LayoutManager;
use crate::runtime::{self, ERROR_EXIT, NO_VALUE};
use crate::weights::WeightAnalyzer;
use crate::CodegenOptions;
use icc_ast::{ClassDecl, MethodDecl, MethodKind, Program};
use icc_codegen::{render_instructions, LirInst, Operand};
use log::{debug, info};
use std::mem;

/// Entry label of the program
pub const MAIN_LABEL: &str = "_ic_main";

/// Generate the complete LIR program.
///
/// Sections, in order: runtime error messages, string literals, dispatch
/// vectors, runtime check routines, methods, `main`, and the exit label.
pub fn generate_program(program: &Program, options: &CodegenOptions) -> Result<String, CodegenError> {
    info!("generating LIR for {} class(es)", program.classes.len());
    let layouts = LayoutManager::build(program)?;
    let mut gen = CodeGenerator::new(&layouts, options.clone());

    let mut methods = String::new();
    let mut main = String::new();

    for class in program.classes.iter().filter(|c| !c.is_library()) {
        for method in class.methods.iter().filter(|m| m.kind != MethodKind::Library) {
            let code = gen.lower_method(class, method)?;
            let text = render_instructions(&code);
            if method.is_main() {
                main.push_str(&format!("\n# main in {}\n{}:\n{}", class.name, MAIN_LABEL, text));
            } else {
                methods.push('\n');
                methods.push_str(&text);
            }
        }
    }

    let mut out = String::new();
    out.push_str(&runtime::render_messages());
    out.push_str(&gen.strings.render());
    out.push_str(&layouts.render_dispatch_vectors());
    out.push_str(&runtime::render_routines());
    out.push_str(&methods);
    out.push_str(&main);
    out.push_str(&format!("{}:\n", ERROR_EXIT));
    Ok(out)
}

impl CodeGenerator<'_> {
    /// Lower one method body. `main` gets no entry label here; the program
    /// assembly places it under `_ic_main`.
    pub fn lower_method(&mut self, class: &ClassDecl, method: &MethodDecl) -> Result<Vec<LirInst>, CodegenError> {
        debug!("lowering {}.{}", class.name, method.name);
        self.registers.free_all();
        self.weights = WeightAnalyzer::analyze_method(method);
        self.class_name = class.name.clone();
        self.in_main = method.is_main();
        self.code.clear();

        if !self.in_main {
            let label = match method.kind {
                MethodKind::Virtual => format!("_{}_{}", class.name, method.name),
                _ => format!("_{}", method.name),
            };
            self.emit(LirInst::label(label));
        }

        lower_block(self, &method.body)?;

        // Every void-typed symbol of the method scope closes the body with a
        // `Return`, whether or not the body can fall through.
        for symbol in &method.scope {
            if let Some(reg) = self.registers.lookup(&symbol.name) {
                self.registers.free(reg)?;
            }
            if symbol.symbol_type.is_void() && !self.in_main {
                self.emit(LirInst::Return(Operand::int(NO_VALUE)));
            }
        }

        self.registers.free_all();
        debug!("{}.{}: {} instruction(s)", self.class_name, method.name, self.code.len());
        Ok(mem::take(&mut self.code))
    }
}
