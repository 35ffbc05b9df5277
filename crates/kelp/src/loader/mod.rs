//! Host loader generation.
//!
//! Produces a self-contained JavaScript unit that embeds the compiled module
//! as base64, builds one forwarding wrapper per extern declaration, instantiates
//! the module and republishes its exports.
//!
//! ```text
//! const wasmBase64 = "AGFzbQ..."
//! const wasmBuffer = Buffer.from(wasmBase64, "base64");
//! const mod = new WebAssembly.Module(wasmBuffer);
//! const importObject = { env: { println: function(value) { return console.log(value); }, } };
//! const instance = new WebAssembly.Instance(mod, importObject);
//! module.exports = instance.exports;
//! ```
//!
//! Host bindings are not checked here; a missing binding fails when the
//! wrapper is first called.
//!
//! kelp identifiers that are JavaScript reserved words are renamed with a `$`
//! prefix wherever they become script bindings (wrapper parameters, ES module
//! export constants). Property names are left alone. A public function named
//! `default` is only reachable through the default export.

use crate::ir::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Module system of the generated loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderFormat {
    /// `module.exports = instance.exports;`
    #[default]
    CommonJs,
    /// `export const f = instance.exports.f;` per public function, plus a default export.
    EsModule,
}

impl LoaderFormat {
    /// File extension conventionally used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            LoaderFormat::CommonJs => "cjs",
            LoaderFormat::EsModule => "mjs",
        }
    }
}

impl fmt::Display for LoaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderFormat::CommonJs => write!(f, "commonjs"),
            LoaderFormat::EsModule => write!(f, "esm"),
        }
    }
}

/// Generate the loader script for a compiled module.
pub fn generate_loader(
    wasm: &[u8],
    info: &ModuleInfo,
    import_module: &str,
    format: LoaderFormat,
) -> String {
    let wasm_base64 = STANDARD.encode(wasm);

    let mut code = String::new();
    code.push_str(&format!("const wasmBase64 = \"{wasm_base64}\";\n"));
    code.push_str("const wasmBuffer = Buffer.from(wasmBase64, \"base64\");\n");
    code.push_str("const mod = new WebAssembly.Module(wasmBuffer);\n");
    code.push_str(&format!(
        "const importObject = {};\n",
        generate_import_object(&info.externs, import_module)
    ));
    code.push_str("const instance = new WebAssembly.Instance(mod, importObject);\n");

    match format {
        LoaderFormat::CommonJs => code.push_str("module.exports = instance.exports;\n"),
        LoaderFormat::EsModule => {
            for f in info.public_functions() {
                code.push_str(&generate_named_export(&f.name));
            }
            code.push_str("export default instance.exports;\n");
        }
    }

    debug!(
        format = %format,
        wasm_bytes = wasm.len(),
        wrappers = info.externs.len(),
        "generated loader"
    );
    code
}

/// `{ env: { name: function(a, b) { return host.binding(a, b); }, ... } }`
pub fn generate_import_object(externs: &[ExternDefinition], import_module: &str) -> String {
    let wrappers: Vec<String> = externs.iter().map(generate_wrapper).collect();
    let key = js_property_key(import_module);
    if wrappers.is_empty() {
        format!("{{ {key}: {{}} }}")
    } else {
        format!("{{ {key}: {{ {} }} }}", wrappers.join(" "))
    }
}

/// `export const f = instance.exports.f;`, going through a renamed binding
/// when `f` cannot be one.
fn generate_named_export(name: &str) -> String {
    if name == "default" {
        warn!("public function `default` is only available through the default export");
        return String::new();
    }
    match js_binding(name) {
        Cow::Borrowed(_) => format!("export const {name} = instance.exports.{name};\n"),
        Cow::Owned(binding) => format!(
            "const {binding} = instance.exports.{name};\nexport {{ {binding} as {name} }};\n"
        ),
    }
}

/// One host wrapper, forwarding positional arguments in declared order.
fn generate_wrapper(def: &ExternDefinition) -> String {
    let params = def
        .parameters
        .iter()
        .map(|p| js_binding(&p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}: function({params}) {{ return {}({params}); }},",
        js_property_key(&def.import_name),
        def.host_binding_name
    )
}

const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// `name` as a script binding: `$`-prefixed if it is a reserved word.
/// kelp identifiers never contain `$`, so the renamed binding cannot collide.
fn js_binding(name: &str) -> Cow<'_, str> {
    if JS_RESERVED.contains(&name) {
        Cow::Owned(format!("${name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Bare identifier when possible, quoted otherwise.
fn js_property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        name.to_string()
    } else {
        format!("{name:?}")
    }
}
