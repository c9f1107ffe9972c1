//! Townplan CLI
//!
//! Builds a TOML assembly file against the in-memory recording engine and
//! prints what it registered.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use townplan_cli::{assemble, render::render, AssemblyFile, Format};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "townplan")]
#[command(about = "Assemble buildings, roads and regions for a simulation engine")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an assembly file and print the result
    Build {
        /// Assembly file (TOML)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Summary)]
        format: Format,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate and build an assembly file, then print its fingerprint
    Check {
        /// Assembly file (TOML)
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> anyhow::Result<AssemblyFile> {
    AssemblyFile::from_file(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            file,
            format,
            output,
        } => {
            let spec = load(&file)?;
            let assembled = assemble(&spec)
                .with_context(|| format!("assembling {}", spec.region.name()))?;
            let text = render(&assembled, format).context("rendering output")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), ?format, "output written");
                }
                None => print!("{text}"),
            }
        }

        Commands::Check { file } => {
            let spec = load(&file)?;
            let assembled = assemble(&spec)
                .with_context(|| format!("assembling {}", spec.region.name()))?;
            info!(
                components = assembled.engine.component_count(),
                links = assembled.engine.link_count(),
                "assembly ok"
            );
            println!("{:016x}", assembled.engine.fingerprint());
        }
    }

    Ok(())
}
