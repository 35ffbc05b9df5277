use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kelp::{build_module, emit_wat, CompileOptions, LoaderFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile kelp source to WebAssembly and a JavaScript host loader.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input kelp source file
    source: PathBuf,

    /// Output file (defaults to the source path with the artifact's extension)
    output: Option<PathBuf>,

    /// Artifact to write
    #[arg(long, value_enum, default_value_t = Emit::Loader)]
    emit: Emit,

    /// Module system of the generated loader
    #[arg(long, value_enum, default_value_t = Format::Commonjs)]
    format: Format,

    /// Import module name used for extern declarations
    #[arg(long, default_value = "env")]
    import_module: String,

    /// Skip validation of the encoded binary
    #[arg(long)]
    no_validate: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// JavaScript loader embedding the binary
    Loader,
    /// WebAssembly text
    Wat,
    /// WebAssembly binary
    Wasm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Commonjs,
    Esm,
}

impl From<Format> for LoaderFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Commonjs => LoaderFormat::CommonJs,
            Format::Esm => LoaderFormat::EsModule,
        }
    }
}

/// Where and what to write.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputConfig {
    emit: Emit,
    path: PathBuf,
}

impl OutputConfig {
    /// Use `output` if given, otherwise the source path with the artifact's extension.
    fn resolve(source: &Path, output: Option<PathBuf>, emit: Emit, format: LoaderFormat) -> Self {
        let path = output.unwrap_or_else(|| {
            let extension = match emit {
                Emit::Loader => format.extension(),
                Emit::Wat => "wat",
                Emit::Wasm => "wasm",
            };
            source.with_extension(extension)
        });
        Self { emit, path }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "kelp=debug" } else { "kelp=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    info!("compiling {}", cli.source.display());

    let source = fs::read_to_string(&cli.source)
        .with_context(|| format!("failed to read {}", cli.source.display()))?;

    let options = CompileOptions {
        loader_format: cli.format.into(),
        validate: !cli.no_validate,
        import_module: cli.import_module.clone(),
    };
    let output = OutputConfig::resolve(&cli.source, cli.output, cli.emit, options.loader_format);

    // Build the whole artifact before touching the output path.
    let artifact: Vec<u8> = match output.emit {
        Emit::Loader => kelp::compile_to_loader(&source, &options)
            .context("compilation failed")?
            .into_bytes(),
        Emit::Wat => {
            let info = build_module(&source).context("compilation failed")?;
            emit_wat(&info, &options)
                .context("compilation failed")?
                .into_bytes()
        }
        Emit::Wasm => kelp::compile_to_wasm(&source, &options).context("compilation failed")?,
    };

    fs::write(&output.path, &artifact)
        .with_context(|| format!("failed to write {}", output.path.display()))?;
    info!("wrote {}", output.path.display());

    Ok(())
}
