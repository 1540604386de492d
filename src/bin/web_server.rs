//! # Web Server Entry Point
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin web_server -- --config config/web.toml
//! ```
//!
//! Without `--config` the defaults apply (listen on 0.0.0.0:8081, store
//! uploads under `./uploads`).

use clap::Parser;
use log::{info, LevelFilter};

use lsb_stego::common::config::{load_config, WebConfig};
use lsb_stego::common::logging::init_logger;
use lsb_stego::web;

/// Command-line arguments for the web server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the web configuration file (TOML format)
    ///
    /// Example: config/web.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen address from the configuration
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(LevelFilter::Info);

    let args = Args::parse();

    let mut config: WebConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => WebConfig::default(),
    };
    if let Some(address) = args.address {
        config.server.address = address;
    }

    info!("🚀 Initializing web server...");
    config.ensure_upload_dirs()?;
    info!(
        "📁 Uploads: encode -> {}, decode -> {}",
        config.uploads.encode_dir.display(),
        config.uploads.decode_dir.display()
    );

    let addr = config.server.address.clone();
    let app = web::router(config);

    info!("🌐 Web server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
