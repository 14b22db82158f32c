//! IC Compiler Driver
//!
//! Reads a type-checked program as JSON, runs the backend and writes the
//! LIR text next to the input.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use icc_ast::Program;
use icc_backend::{generate_program, CodegenOptions, LayoutManager};
use icc_codegen::DEFAULT_REGISTER_COUNT;
use icc_common::CompilerError;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "icc", version, about = "IC Compiler - LIR backend")]
struct Args {
    /// Typed program (JSON)
    input: PathBuf,

    /// Output LIR file (defaults to the input with a .lir extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the LIR to stdout instead of writing a file
    #[arg(long)]
    print_lir: bool,

    /// Print every class layout before generating code
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "text")]
    dump_layouts: Option<LayoutFormat>,

    /// Precede each statement's code with a `# line N` comment
    #[arg(long)]
    annotate: bool,

    /// Size of the register pool
    #[arg(long, value_name = "N", default_value_t = DEFAULT_REGISTER_COUNT)]
    registers: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> CodegenOptions {
        CodegenOptions {
            register_count: self.registers,
            annotate: self.annotate,
        }
    }

    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension("lir"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::init();
    }

    let program = read_program(&args.input)?;

    if let Some(format) = args.dump_layouts {
        print!("{}", dump_layouts(&program, format)?);
    }

    let lir = compile(&program, &args.options())?;

    if args.print_lir {
        print!("{}", lir);
    } else {
        let path = args.output_path();
        fs::write(&path, &lir).with_context(|| format!("Failed to write '{}'", path.display()))?;
        info!("LIR written to {}", path.display());
    }

    Ok(())
}

fn read_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    let program: Program = serde_json::from_str(&text)
        .map_err(CompilerError::from)
        .with_context(|| format!("'{}' is not a typed IC program", path.display()))?;
    info!("{}: {} class(es)", path.display(), program.classes.len());
    Ok(program)
}

fn dump_layouts(program: &Program, format: LayoutFormat) -> Result<String> {
    let layouts = LayoutManager::build(program).map_err(CompilerError::from)?;
    Ok(match format {
        LayoutFormat::Text => layouts.to_string(),
        LayoutFormat::Json => {
            let mut json = serde_json::to_string_pretty(&layouts).map_err(CompilerError::from)?;
            json.push('\n');
            json
        }
    })
}

fn compile(program: &Program, options: &CodegenOptions) -> Result<String> {
    let lir = generate_program(program, options).map_err(CompilerError::from)?;
    Ok(lir)
}
