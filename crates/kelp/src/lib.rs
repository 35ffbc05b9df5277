//! kelp: a small typed language compiled to WebAssembly.
//!
//! This crate provides the compilation pipeline that turns kelp source text
//! into WebAssembly text, a validated binary, and a JavaScript loader that
//! embeds the binary and wires host callbacks.
//!
//! ```text
//! source ─► parser ─► ast::Program ─► ir::build_module_info ─► ModuleInfo
//!        ─► codegen ─► WebAssembly text ─► Toolchain ─► .wasm ─► loader ─► .cjs/.mjs
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod loader;
pub mod parser;
pub mod sexpr;
pub mod toolchain;

// Re-export key types for convenience
pub use anyhow::{Context, Result};
use codegen::CodeGenerator;
pub use error::{CompileError, Diagnostic, LoweringError, ParseFailure};
pub use ir::ModuleInfo;
pub use loader::LoaderFormat;
use toolchain::{Toolchain, WatToolchain};
use tracing::{debug, info};

/// Configuration options for compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Module system of the generated loader
    pub loader_format: LoaderFormat,
    /// Validate the encoded binary before emitting a loader
    pub validate: bool,
    /// Import module name for every extern declaration
    pub import_module: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            loader_format: LoaderFormat::CommonJs,
            validate: true,
            import_module: codegen::DEFAULT_IMPORT_MODULE.to_string(),
        }
    }
}

/// Parse kelp source and build its declaration model.
pub fn build_module(source: &str) -> Result<ModuleInfo> {
    let program = parser::parse_program(source).map_err(CompileError::from)?;
    let info = ir::build_module_info(&program);

    if let Some(entry) = info.entry_point() {
        debug!(function = %entry.name, "entry point detected");
    }
    Ok(info)
}

/// Emit canonical WebAssembly text for a declaration model.
pub fn emit_wat(info: &ModuleInfo, options: &CompileOptions) -> Result<String> {
    let wat = CodeGenerator::new(&options.import_module)
        .generate_wat(info)
        .map_err(CompileError::from)?;
    Ok(wat)
}

/// Compile kelp source to WebAssembly text.
///
/// # Example
/// ```
/// use kelp::{compile_to_wat, CompileOptions};
///
/// let wat = compile_to_wat("struct Foo { a: i32, b: i32 }", &CompileOptions::default()).unwrap();
/// assert_eq!(wat, "(module (type $Foo (struct (field $a i32) (field $b i32))))");
/// ```
pub fn compile_to_wat(source: &str, options: &CompileOptions) -> Result<String> {
    let info = build_module(source).context("failed to build module")?;
    emit_wat(&info, options).context("failed to emit WebAssembly text")
}

/// Compile kelp source to a WebAssembly binary using the default toolchain.
pub fn compile_to_wasm(source: &str, options: &CompileOptions) -> Result<Vec<u8>> {
    let info = build_module(source).context("failed to build module")?;
    let wat = emit_wat(&info, options).context("failed to emit WebAssembly text")?;
    assemble(&wat, &WatToolchain::new(options.validate))
}

/// Compile kelp source all the way to a JavaScript loader.
///
/// This is the main entry point for the compilation pipeline.
///
/// # Example
/// ```no_run
/// use kelp::{compile_to_loader, CompileOptions};
///
/// let source = std::fs::read_to_string("hello.kelp").unwrap();
/// let js = compile_to_loader(&source, &CompileOptions::default()).unwrap();
/// std::fs::write("hello.cjs", js).unwrap();
/// ```
pub fn compile_to_loader(source: &str, options: &CompileOptions) -> Result<String> {
    compile_with_toolchain(source, options, &WatToolchain::new(options.validate))
}

/// Same as [`compile_to_loader`], with a caller-supplied toolchain.
pub fn compile_with_toolchain<T: Toolchain>(
    source: &str,
    options: &CompileOptions,
    toolchain: &T,
) -> Result<String> {
    let info = build_module(source).context("failed to build module")?;
    loader_for(&info, options, toolchain)
}

/// Compile an already-built declaration model to a JavaScript loader.
pub fn compile_module(info: &ModuleInfo, options: &CompileOptions) -> Result<String> {
    loader_for(info, options, &WatToolchain::new(options.validate))
}

fn loader_for<T: Toolchain>(
    info: &ModuleInfo,
    options: &CompileOptions,
    toolchain: &T,
) -> Result<String> {
    let wat = emit_wat(info, options).context("failed to emit WebAssembly text")?;
    let wasm = assemble(&wat, toolchain)?;

    let js = loader::generate_loader(&wasm, info, &options.import_module, options.loader_format);
    info!(
        wasm_bytes = wasm.len(),
        loader_bytes = js.len(),
        "compilation complete"
    );
    Ok(js)
}

fn assemble<T: Toolchain>(wat: &str, toolchain: &T) -> Result<Vec<u8>> {
    let wasm = toolchain
        .assemble(wat)
        .context("failed to assemble WebAssembly module")?;
    Ok(wasm)
}
