//! Story Train - illustration gateway server.

use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use story_train::cli::Cli;
use story_train::config::{resolve_provider_kind, ProcessEnv, ProviderConfig, ServerConfig};
use story_train::context::ServiceContext;
use story_train::env_file::{discover_env_file, load_env_file};
use story_train::error::ImageError;
use story_train::provider::ProviderKind;
use story_train::secret_store::KeychainStore;
use story_train::server::{serve, AppState};

fn main() {
    let cli = Cli::parse();

    // Load .env while the process is still single-threaded, and before the
    // log filter is read so RUST_LOG may live there too.
    let env_path = discover_env_file(cli.env_file.as_deref());
    let env_loaded = env_path.as_deref().map(load_env_file).transpose();

    init_tracing(cli.verbose);

    match env_loaded {
        Ok(Some(applied)) => {
            if let Some(ref path) = env_path {
                tracing::debug!(path = %path.display(), applied, "loaded .env");
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", ImageError::Io(e));
            process::exit(1);
        }
    }

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ImageError::Io)
        .and_then(|runtime| runtime.block_on(run(cli)));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "story_train=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), ImageError> {
    let kind = resolve_provider_kind(cli.provider.as_deref(), &ProcessEnv)?;
    let provider_config = ProviderConfig::resolve(kind, &ProcessEnv, &KeychainStore::default())?;
    let server_config = ServerConfig::resolve(&cli, &ProcessEnv)?;

    tracing::debug!(config = ?provider_config, "resolved provider configuration");
    if provider_config.credential.is_none() && kind != ProviderKind::Pollinations {
        tracing::warn!(
            provider = %kind,
            env_var = %provider_config.credential_var,
            "no API key configured"
        );
    }

    let ctx = ServiceContext::live(&provider_config)?;
    let state = AppState::new(ctx.generator, &server_config.static_root);
    if !state.static_root().is_dir() {
        tracing::warn!(root = %server_config.static_root.display(), "static root does not exist");
    }

    let listener = TcpListener::bind((server_config.host.as_str(), server_config.port)).await?;
    tracing::info!(
        provider = %kind,
        root = %state.static_root().display(),
        "Story Train server running: http://{}:{}",
        server_config.host,
        server_config.port
    );

    serve(listener, state).await
}
