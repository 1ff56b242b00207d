//! fixlearn-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid with
//! `FIXLEARN_*` environment variables, opens the configured message store,
//! and serves the Fix&Learn API over HTTP.
//!
//! ```sh
//! FIXLEARN_DATABASE_URL=sqlite://fixlearn.db \
//! FIXLEARN_AI_API_KEY=... \
//! FIXLEARN_API_BEARER_TOKEN=... \
//!   cargo run -p fixlearn-server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use fixlearn_model::ChatCompletionsClient;
use fixlearn_server::{AppState, ServerConfig, store::AnyStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fix&Learn API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load and check configuration before touching the network.
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  let target = server_cfg
    .validate()
    .context("invalid configuration")?;

  let store = AnyStore::connect(&target, server_cfg.database_key.as_deref())
    .await
    .with_context(|| format!("failed to open message store {target:?}"))?;

  let model = ChatCompletionsClient::new(server_cfg.model_config())
    .context("failed to build model client")?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!(model = %server_cfg.model_name, "model client ready");

  let state = AppState::new(Arc::new(store), Arc::new(model), server_cfg);
  let app = fixlearn_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
