//! Command-line interface

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chartpatch_application::{OverrideEngine, RunReport};
use chartpatch_infrastructure::{InMemoryResourceCollection, PlainResourceFactory};
use clap::{Parser, ValueEnum};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "chartpatch")]
#[command(about = "Apply chart overrides to HelmRelease manifests", version)]
pub struct Cli {
    /// Path to the transformer configuration (global + charts)
    pub config: PathBuf,

    /// Manifest files to patch (reads standard input when omitted)
    pub inputs: Vec<PathBuf>,

    /// Write the patched manifests to this file instead of standard output
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Rendering of the patched manifest stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `---` separated YAML documents
    Yaml,
    /// A JSON array of documents
    Json,
}

/// Runs one transformation as described by `cli`.
pub fn run(cli: &Cli) -> Result<RunReport, Box<dyn Error>> {
    let config = fs::read(&cli.config)
        .map_err(|e| format!("failed to read {}: {e}", cli.config.display()))?;
    let mut engine = OverrideEngine::configure(&config, PlainResourceFactory::new())?;

    let mut collection = load_manifests(&cli.inputs)?;
    debug!(resources = collection.len(), "loaded manifests");

    let report = engine.run(&mut collection)?;

    let rendered = match cli.format {
        OutputFormat::Yaml => collection.to_yaml()?,
        OutputFormat::Json => collection.to_json()?,
    };
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?,
        None => io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(report)
}

fn load_manifests(inputs: &[PathBuf]) -> Result<InMemoryResourceCollection, Box<dyn Error>> {
    if inputs.is_empty() {
        return Ok(InMemoryResourceCollection::read_yaml(io::stdin().lock())?);
    }

    let mut collection = InMemoryResourceCollection::new();
    for path in inputs {
        collection.extend(load_file(path)?);
    }
    Ok(collection)
}

fn load_file(path: &Path) -> Result<InMemoryResourceCollection, Box<dyn Error>> {
    let yaml =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    InMemoryResourceCollection::from_yaml(&yaml)
        .map_err(|e| format!("{}: {e}", path.display()).into())
}
