// Provisioner API Server Binary
//
// Entry point for the prototype provisioner API server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use observability::TracingConfig;
use provisioner_api::{config::DEFAULT_LISTEN_ADDR, ApiServer, ServerConfig};

#[derive(Parser)]
#[command(name = "provisioner-api")]
#[command(about = "Prototype provisioner - clone templates into VM, network and storage sets", long_about = None)]
#[command(version)]
struct Cli {
    /// Listen address
    #[arg(short, long, env = "PROVISIONER_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen: SocketAddr,

    /// TOML file with templates to seed instead of the built-in set
    #[arg(long, env = "PROVISIONER_SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Ignore `id` keys in override payloads
    #[arg(long, env = "PROVISIONER_LOCK_IDENTIFIERS")]
    lock_identifiers: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "PROVISIONER_METRICS_ADDR")]
    metrics_listen: Option<SocketAddr>,

    /// Log level
    #[arg(long, env = "PROVISIONER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "PROVISIONER_LOG_JSON")]
    log_json: bool,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        ServerConfig {
            listen_addr: cli.listen,
            seed_file: cli.seed_file,
            lock_identifiers: cli.lock_identifiers,
            metrics_addr: cli.metrics_listen,
            tracing: TracingConfig {
                level: cli.log_level,
                json: cli.log_json,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config: ServerConfig = Cli::parse().into();

    observability::init_tracing(&config.tracing)?;

    tracing::info!("Starting prototype provisioner API server");

    if let Some(addr) = config.metrics_addr {
        observability::install_prometheus(addr)?;
    }

    ApiServer::new(config)?.run().await
}
