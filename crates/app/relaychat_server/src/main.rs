//! relaychat relay server binary.
//!
//! Reads configuration once at startup, then serves `/api/chat`,
//! `/api/upload` and `/api/health` until interrupted.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use relaychat_api::config::{AllowedOrigin, DEFAULT_MAX_UPLOAD_BYTES, RelayConfig};
use relaychat_core::upstream::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_SIZE};
use tracing::info;

/// CLI arguments for the relay server. Every flag can also come from the
/// environment or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "relaychat_server", version, about = "relaychat relay server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 10000)]
    port: u16,

    /// Credential for the upstream provider. Never sent to clients.
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    openai_api_key: String,

    /// Base URL of the OpenAI-compatible upstream.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Model identifier sent with every completion request.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    chat_model: String,

    /// Resolution requested for generated images.
    #[arg(long, env = "IMAGE_SIZE", default_value = DEFAULT_IMAGE_SIZE)]
    image_size: String,

    /// Browser origin allowed to call the relay (`*` for any).
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    allowed_origin: AllowedOrigin,

    /// Directory for request-scoped upload files.
    #[arg(long, env = "UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

impl Args {
    fn into_config(self) -> RelayConfig {
        let mut config = RelayConfig::new(self.openai_api_key);
        config.bind_addr = format!("{}:{}", self.host, self.port);
        config.openai_base_url = self.openai_base_url;
        config.chat_model = self.chat_model;
        config.image_size = self.image_size;
        config.allowed_origin = self.allowed_origin;
        if let Some(dir) = self.upload_dir {
            config.upload_dir = dir;
        }
        config.max_upload_bytes = self.max_upload_bytes;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relaychat_api=debug,relaychat_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.into_config();

    info!(
        bind_addr = %config.bind_addr,
        allowed_origin = %config.allowed_origin,
        upload_dir = %config.upload_dir.display(),
        "starting relaychat_server"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = relaychat_api::router(relaychat_api::AppState::new(config));

    info!(addr = %local_addr, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("interrupt received, shutting down");
    }
}
