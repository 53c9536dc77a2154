//! foxden - reproducible browser profile assembler.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use foxden_core::Manifest;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble a reproducible browser profile", long_about = None)]
struct Args {
    /// Path to the build manifest (built-in defaults are used if absent)
    #[arg(short, long, default_value = "foxden.toml")]
    manifest: PathBuf,

    /// Directory holding `prefs/` overrides and `style/` templates
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Output directory for the assembled profile (overrides the manifest)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// The build is pure I/O fan-out, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let manifest = Manifest::load(&args.manifest).await?;
    let output = args
        .output
        .unwrap_or_else(|| manifest.profile.output.clone());

    foxden_core::build_profile(&manifest, &args.input, &output).await
}
