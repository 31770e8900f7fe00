//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

/// Local illustration gateway - one contract over several image providers.
///
/// Every flag falls back to an environment variable (also read from `.env`).
#[derive(Parser, Debug)]
#[command(name = "story-train", version, about)]
pub struct Cli {
    /// Bind address [env: HOST, default: 0.0.0.0].
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port [env: PORT, default: 4173].
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve static files from [env: `STATIC_ROOT`, default: public].
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Image provider: pixazo, openrouter, pollinations [env: `IMAGE_PROVIDER`].
    #[arg(long)]
    pub provider: Option<String>,

    /// Path to a `.env` file (default: next to the executable, then the current directory).
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}
