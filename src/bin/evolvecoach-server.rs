// ABOUTME: EvolveCoach server binary
// ABOUTME: Parses CLI overrides, initializes logging, and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

use clap::Parser;
use tracing_subscriber::EnvFilter;

use evolvecoach::config::ServerConfig;
use evolvecoach::errors::AppResult;

/// EvolveCoach coaching platform server
#[derive(Parser)]
#[command(name = "evolvecoach-server", version, about)]
struct Args {
    /// HTTP port to listen on (overrides EVOLVECOACH_HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    evolvecoach::server::run(config).await
}
