use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stegotext::{config, pipeline};
use tracing_subscriber::{EnvFilter, fmt};

/// Hide a passage in an image's LSBs and render it back out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (defaults to stegotext.toml; missing file means defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Encode the configured passage into the carrier image
    Encode,
    /// Decode the configured encoded image into a visualization
    Decode,
    /// Encode, then decode the result (default)
    Run,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // Load config first so we can honor logging.filter directive.
    let manager = config::ConfigManager::load(args.config)?;
    let cfg = manager.to_struct()?;
    let filter_directive = cfg
        .logging
        .as_ref()
        .and_then(|l| l.filter.clone())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info,stegotext=debug".to_string());
    fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .init();
    tracing::debug!(config=%manager.path().display(), mode=?cfg.encode.mode, "configuration loaded");

    let command = args.command.unwrap_or(Command::Run);
    if matches!(command, Command::Encode | Command::Run) {
        let face = cfg.face()?;
        tracing::info!("encoding the image");
        pipeline::encode_image(&cfg.encode_params(), &face)?;
    }
    if matches!(command, Command::Decode | Command::Run) {
        tracing::info!("decoding the image");
        pipeline::decode_image(&cfg.decode_params())?;
    }
    Ok(())
}
