//! nexus-prisma-gen: Generate Nexus GraphQL binding modules from a DMMF document
//!
//! Reads a DMMF JSON document (bare or wrapped in `{datamodel: ...}`) and an
//! optional settings JSON file, then writes:
//! - `index.js` and `index.mjs` runtime modules
//! - `index.d.ts` declarations
//! - `schema.graphql` when `--sdl` is given

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod input;

/// File name of the optional SDL dump
const SDL_FILE: &str = "schema.graphql";

#[derive(Parser, Debug)]
#[command(name = "nexus-prisma-gen")]
#[command(about = "Generate Nexus GraphQL binding modules from a DMMF document")]
struct Args {
    /// DMMF JSON document
    #[arg(required = true)]
    dmmf: PathBuf,

    /// Settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "node_modules/.nexus-prisma")]
    output: PathBuf,

    /// Also write the generated type graph as GraphQL SDL
    #[arg(long)]
    sdl: bool,

    /// Log filter, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log_filter {
        Some(filter) => EnvFilter::builder().parse_lossy(filter),
        None => EnvFilter::builder().from_env_lossy(),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let document = input::read_document(&args.dmmf)?;
    let settings = input::read_settings(args.settings.as_deref())?;
    tracing::debug!(?settings, "resolved settings");

    let schema = nexus_prisma::generate_schema(&document, &settings)?;
    let modules = nexus_prisma::emit::emit_modules(&schema)?;

    std::fs::create_dir_all(&args.output)?;
    for module in &modules {
        let path = args.output.join(&module.file_name);
        std::fs::write(&path, &module.content)?;
        tracing::debug!(path = %path.display(), "wrote module");
    }
    if args.sdl {
        std::fs::write(args.output.join(SDL_FILE), schema.to_sdl())?;
    }

    eprintln!(
        "Generated {} modules for {} models in {}",
        modules.len(),
        document.models.len(),
        args.output.display()
    );

    Ok(())
}
