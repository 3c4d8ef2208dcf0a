//! greeterd, the greeter daemon.
//!
//! Serves `greeter.v1.GreeterService` over gRPC and the same method as
//! JSON over HTTP, with the gateway forwarding to the gRPC listener.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use greeter::daemon;
use greeter::server::config::Config;
use greeter::telemetry::trace::Telemetry;

/// Greeter daemon: gRPC listener plus JSON/HTTP gateway.
#[derive(Parser)]
#[command(name = "greeterd")]
#[command(version = greeter::PKG_VERSION)]
#[command(about = "Greeter gRPC and HTTP gateway daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;

    let telemetry = config.telemetry.traces.then(Telemetry::stdout);
    init_logging(&config, telemetry.as_ref());

    info!(version = greeter::version_string(), "greeterd starting");

    let result = serve(&config, telemetry.clone()).await;
    if let Err(err) = &result {
        error!(error = %err, "greeterd failed");
    }

    // Flush buffered spans before exiting, whatever the outcome.
    let shutdown = telemetry.map(|t| t.shutdown()).transpose();
    result?;
    shutdown?;

    Ok(())
}

/// Start both units and wait until one fails or the process is interrupted.
async fn serve(config: &Config, telemetry: Option<Telemetry>) -> greeter::Result<()> {
    let running = daemon::launch(config, telemetry).await?;
    info!(
        grpc = %running.rpc_addr,
        http = %running.gateway_addr,
        "greeterd ready"
    );

    tokio::select! {
        result = running.supervisor.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    }
}

/// Initialise tracing (default from config; override with RUST_LOG).
fn init_logging(config: &Config, telemetry: Option<&Telemetry>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry.map(|t| t.layer()))
        .init();
}
