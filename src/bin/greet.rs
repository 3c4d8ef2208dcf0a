//! greet, the greeter CLI client
//!
//! Calls a running greeterd over gRPC or through its HTTP gateway.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tonic::transport::{Certificate, ClientTlsConfig};

use greeter::client::{GatewayClient, ServiceClient};
use greeter::security::DEFAULT_TLS_DOMAIN;

/// Greeter CLI client
#[derive(Parser)]
#[command(name = "greet")]
#[command(version = greeter::PKG_VERSION)]
#[command(about = "Greeter client")]
struct Args {
    /// gRPC listener address
    #[arg(
        short,
        long,
        env = "GREETER_ADDRESS",
        default_value = "http://127.0.0.1:8080"
    )]
    address: String,

    /// HTTP gateway address
    #[arg(
        short,
        long,
        env = "GREETER_GATEWAY",
        default_value = "http://127.0.0.1:8081"
    )]
    gateway: String,

    /// PEM trust root; connects to the gRPC listener over TLS when set
    #[arg(long)]
    ca_cert: Option<PathBuf>,

    /// Server name expected on TLS connections
    #[arg(long, default_value = DEFAULT_TLS_DOMAIN)]
    domain: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Greet over gRPC
    Hello {
        #[arg(default_value = "World")]
        name: String,
    },

    /// Greet through the HTTP gateway
    Http {
        #[arg(default_value = "World")]
        name: String,
    },

    /// List services advertised through reflection
    Services,

    /// Show the methods of a service
    Describe {
        #[arg(default_value = greeter::proto::SERVICE_NAME)]
        service: String,
    },

    /// Print client version
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Version => {
            println!("greet {}", greeter::version_string());
        }

        Command::Http { name } => {
            let client = GatewayClient::new(&args.gateway);
            let response = client.say_hello(name).await?;
            println!("{}", serde_json::to_string(&response)?);
        }

        Command::Hello { name } => {
            let client = connect(&args.address, args.ca_cert.as_deref(), &args.domain).await?;
            let response = client.say_hello(name).await?;
            println!("{}", response.message);
        }

        Command::Services => {
            let client = connect(&args.address, args.ca_cert.as_deref(), &args.domain).await?;
            for service in client.list_services().await? {
                println!("{service}");
            }
        }

        Command::Describe { service } => {
            let client = connect(&args.address, args.ca_cert.as_deref(), &args.domain).await?;
            let description = client.describe_service(&service).await?;
            println!("service {}", description.name);
            for method in description.methods {
                println!(
                    "  rpc {}({}) returns ({})",
                    method.name, method.input_type, method.output_type
                );
            }
        }
    }

    Ok(())
}

/// Connect to the gRPC listener, over TLS when a trust root is given.
async fn connect(
    address: &str,
    ca_cert: Option<&Path>,
    domain: &str,
) -> Result<ServiceClient, Box<dyn std::error::Error>> {
    let client = match ca_cert {
        Some(path) => {
            let ca = std::fs::read(path)?;
            let tls = ClientTlsConfig::new()
                .ca_certificate(Certificate::from_pem(ca))
                .domain_name(domain);
            ServiceClient::connect_tls(address, tls).await?
        }
        None => ServiceClient::connect(address).await?,
    };
    Ok(client)
}
