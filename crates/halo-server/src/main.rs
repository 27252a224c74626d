//! Halo engine server.
//!
//! Listens for controller connections and runs one Game of Life session
//! per connection.
//!
//! # Usage
//!
//! ```bash
//! # Listen on 0.0.0.0:8030
//! halo-server
//!
//! # Serve a single session then exit
//! halo-server --once --bind 127.0.0.1:8030
//!
//! # Verbose logging
//! RUST_LOG=halo_engine=trace halo-server
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use halo_engine::EngineConfig;
use halo_server::{Server, ServerConfig};

/// Halo - parallel Game of Life engine server
#[derive(Parser, Debug)]
#[command(name = "halo-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short = 'b', long, env = "HALO_BIND", default_value = "0.0.0.0:8030")]
    bind: SocketAddr,

    /// Census report period in milliseconds
    #[arg(long, default_value_t = 2000)]
    census_ms: u64,

    /// Largest grid, in cells, a controller may request
    #[arg(long, default_value_t = 1 << 24)]
    max_cells: usize,

    /// Serve one session, then exit
    #[arg(long)]
    once: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "HALO_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize logging with the specified level
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "halo_server={level},halo_engine={level},halo_wire={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = ServerConfig {
        bind_addr: args.bind,
        engine: EngineConfig {
            census_period: Duration::from_millis(args.census_ms),
            max_cells: args.max_cells,
            ..EngineConfig::default()
        },
    };
    let server = Server::bind(config).context("Failed to start server")?;

    if args.once {
        let report = server.serve_one().context("Session failed")?;
        info!(exit = ?report.exit, turn = report.turn, "served one session, exiting");
        return Ok(());
    }

    server.run().context("Accept loop failed")
}
