use anyhow::Result;
use clap::Parser;
use config::CliOverrides;
use gateway::{GatewayServer, telemetry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rnd-gateway",
    version,
    about = "REST gateway for the R&D microservice",
    long_about = "Forwards entity operations to the R&D microservice and authorizes them from \
                  the caller's directory group membership.\n\nSettings are read from the \
                  config file, then RND_* environment variables, then these flags."
)]
struct Args {
    #[arg(short, long, env = "RND_CONFIG", help = "Config file (.toml, .yaml or .yml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Interface to bind")]
    host: Option<String>,

    #[arg(short, long, help = "Port to listen on")]
    port: Option<u16>
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cli = CliOverrides {
        host: args.host,
        port: args.port
    };
    let config = tracing::subscriber::with_default(
        telemetry::bootstrap_subscriber(std::io::stderr),
        || config::resolve(args.config.as_deref(), &cli)
    )?;

    telemetry::init_tracing(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Configuration loaded");

    GatewayServer::new(&config)?.run().await?;
    Ok(())
}
