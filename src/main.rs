// ztone - Desktop client access layer for the ZeroTier One service
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use ztone::client::{JoinOptions, ServiceClient};
use ztone::config::{discover_credentials, HelperProvisioner, ServiceDirs};
use ztone::errors::{self, ClientError};

#[derive(Parser, Debug)]
#[command(name = "ztone")]
#[command(about = "Desktop client access layer for the ZeroTier One service", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding authtoken.secret and zerotier-one.port
    /// (default: the platform's per-user service directory)
    #[arg(long = "service-dir", global = true)]
    service_dir: Option<PathBuf>,

    /// Talk to the service on this port, skipping the port file
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Show node address, version, and online state
    Status,
    /// List joined networks
    Networks,
    /// Join a network
    Join {
        /// 16-digit hex network id
        network_id: String,
        /// Refuse managed IP assignment and managed routes
        #[arg(long = "no-managed")]
        no_managed: bool,
        /// Accept managed routes to public IP space
        #[arg(long = "allow-global")]
        allow_global: bool,
        /// Accept a managed default route (full tunnel)
        #[arg(long = "allow-default")]
        allow_default: bool,
    },
    /// Leave a network
    Leave {
        /// 16-digit hex network id
        network_id: String,
    },
    /// List known peers
    Peers,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let client = build_client(&args).await?;
    let json = args.json;

    match args.command {
        Command::Status => run_status(&client, json).await,
        Command::Networks => run_networks(&client, json).await,
        Command::Join {
            ref network_id,
            no_managed,
            allow_global,
            allow_default,
        } => {
            let options = JoinOptions {
                allow_managed: !no_managed,
                allow_global,
                allow_default,
            };
            run_join(&client, network_id, &options).await
        }
        Command::Leave { ref network_id } => run_leave(&client, network_id).await,
        Command::Peers => run_peers(&client, json).await,
    }
}

/// Initialize tracing to stderr so command output stays clean on stdout
///
/// Default: INFO level, can be overridden with RUST_LOG env var
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}

/// Build a client from CLI flags, discovering credentials on disk
async fn build_client(args: &Args) -> Result<ServiceClient> {
    let timeout = args.timeout.map(Duration::from_secs);

    let dirs = match &args.service_dir {
        Some(dir) => ServiceDirs::with_local(dir.clone()),
        None => ServiceDirs::platform_defaults()?,
    };

    // An explicit --port overrides the port file but the auth token
    // still comes from disk.
    let client = if let Some(port) = args.port {
        let credentials = discover_credentials(&dirs, &HelperProvisioner).await?;
        ServiceClient::with_timeout(port, credentials.auth_token, timeout)
    } else {
        ServiceClient::connect(&dirs, &HelperProvisioner, timeout)
            .await
            .context("failed to initialize the service client")?
    };

    Ok(client)
}

async fn run_status(client: &ServiceClient, json: bool) -> Result<()> {
    let status = match client.node_status().await {
        Ok(status) => status,
        Err(e @ ClientError::Unreachable { .. }) => {
            eprintln!("{}", errors::service_unreachable_notice("reading status"));
            return Err(e.into());
        }
        Err(e) => return Err(e).context("failed to read node status"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("address: {}", status.address);
    println!("version: {}", status.version);
    println!("online:  {}", if status.online { "yes" } else { "no" });
    if status.tcp_fallback_active {
        println!("warning: traffic is relaying over slow TCP fallback");
    }

    Ok(())
}

async fn run_networks(client: &ServiceClient, json: bool) -> Result<()> {
    let networks = match client.list_networks().await {
        Ok(networks) => networks,
        Err(e @ ClientError::Unreachable { .. }) => {
            eprintln!("{}", errors::service_unreachable_notice("listing networks"));
            return Err(e.into());
        }
        Err(e) => return Err(e).context("failed to list networks"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&networks)?);
        return Ok(());
    }

    if networks.is_empty() {
        println!("no joined networks");
        return Ok(());
    }

    println!(
        "{:<18} {:<24} {:<14} {:<8} ips",
        "id", "name", "status", "type"
    );
    for network in &networks {
        println!(
            "{:<18} {:<24} {:<14} {:<8} {}",
            network.id,
            network.name,
            network.status,
            network.network_type,
            network.assigned_addresses.join(", ")
        );
    }

    Ok(())
}

async fn run_join(client: &ServiceClient, network_id: &str, options: &JoinOptions) -> Result<()> {
    match client.join_network(network_id, options).await {
        Ok(()) => {
            println!("joined {}", network_id);
            Ok(())
        }
        Err(e @ ClientError::Unreachable { .. }) => {
            eprintln!("{}", errors::service_unreachable_notice("joining network"));
            Err(e.into())
        }
        Err(e) => Err(e).with_context(|| format!("failed to join network {}", network_id)),
    }
}

async fn run_leave(client: &ServiceClient, network_id: &str) -> Result<()> {
    match client.leave_network(network_id).await {
        Ok(()) => {
            println!("left {}", network_id);
            Ok(())
        }
        Err(e @ ClientError::Unreachable { .. }) => {
            eprintln!("{}", errors::service_unreachable_notice("leaving network"));
            Err(e.into())
        }
        Err(e) => Err(e).with_context(|| format!("failed to leave network {}", network_id)),
    }
}

async fn run_peers(client: &ServiceClient, json: bool) -> Result<()> {
    let peers = match client.list_peers().await {
        Ok(peers) => peers,
        Err(e @ ClientError::Unreachable { .. }) => {
            eprintln!("{}", errors::service_unreachable_notice("listing peers"));
            return Err(e.into());
        }
        Err(e) => return Err(e).context("failed to list peers"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&peers)?);
        return Ok(());
    }

    if peers.is_empty() {
        println!("no known peers");
        return Ok(());
    }

    println!("{:<12} {:<8} {:<9} path", "address", "role", "latency");
    for peer in &peers {
        let path = peer
            .paths
            .iter()
            .find(|p| p.preferred)
            .map(|p| p.address.as_str())
            .unwrap_or("-");
        println!(
            "{:<12} {:<8} {:<9} {}",
            peer.address,
            peer.role,
            format_latency(peer.latency),
            path
        );
    }

    Ok(())
}

fn format_latency(latency: i64) -> String {
    if latency < 0 {
        "-".to_string()
    } else {
        format!("{}ms", latency)
    }
}
