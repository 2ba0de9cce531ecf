use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use token_clone_detector::blockchain::{BlockchainClient, OnChainRegistry};
use token_clone_detector::models::parse_wallet;
use token_clone_detector::storage::MemoryRegistry;
use token_clone_detector::{RegistryScanner, RegistrySource, Report, ScanConfig, ScanResponse};

/// Token Registry Clone Scanner - find impersonation clusters in a token registry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-RPC endpoint of the registry chain
    #[arg(short, long, env = "REGISTRY_RPC_URL", default_value = "http://127.0.0.1:8545")]
    rpc: String,

    /// Registry contract address
    #[arg(long, env = "REGISTRY_ADDRESS")]
    registry: Option<String>,

    /// Scan an exported logbook file instead of the chain
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// JSON policy file overriding thresholds, scoring and retries
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Print the response payload as JSON
    #[arg(long)]
    json: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trust score for a token identity
    Token { name: String, symbol: String },
    /// Listing advisory for a token identity
    Dex { name: String, symbol: String },
    /// Clone-count trust score for a creator wallet
    Creator { wallet: String },
    /// Cluster risk ranking and a creator's place in it
    Clusters { wallet: String },
}

/// Print a scan result and pick the exit code: 0 = clean, 1 = suspicion, 3 = failure
fn emit<T: Report>(result: token_clone_detector::Result<T>, json: bool) -> i32 {
    let code = match &result {
        Ok(report) if report.flags_suspicion() => 1,
        Ok(_) => 0,
        Err(_) => 3,
    };

    if json {
        match serde_json::to_string_pretty(&ScanResponse::from(result)) {
            Ok(payload) => println!("{}", payload),
            Err(e) => {
                eprintln!("❌ Failed to encode response: {}", e);
                return 3;
            }
        }
    } else {
        match result {
            Ok(report) => println!("{}", report),
            Err(e) => {
                println!("\n❌ Scan failed [{}]: {}\n", e.kind(), e);
                if e.kind() == "upstream_unavailable" {
                    println!("The registry could not be read; this is NOT a clean result.\n");
                }
            }
        }
    }

    code
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("token_clone_detector=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("token_clone_detector=info")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match &args.policy {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };

    let source: Arc<dyn RegistrySource> = match &args.snapshot {
        Some(path) => {
            eprintln!("📂 Snapshot: {}", path.display());
            Arc::new(MemoryRegistry::from_file(path)?)
        }
        None => {
            let registry = args
                .registry
                .as_deref()
                .ok_or("a registry address is required without --snapshot (--registry or REGISTRY_ADDRESS)")?;
            let registry = parse_wallet(registry)?;

            eprintln!("📡 RPC: {}", args.rpc);
            let client = Arc::new(BlockchainClient::new(&args.rpc).await?);
            eprintln!("✅ Connected to {}", client.chain_name());
            Arc::new(OnChainRegistry::connect(client, registry).await?)
        }
    };

    let scanner = RegistryScanner::with_config(source, config);

    let code = match &args.command {
        Command::Token { name, symbol } => emit(scanner.token_trust_scan(name, symbol).await, args.json),
        Command::Dex { name, symbol } => emit(scanner.dex_suspicion_scan(name, symbol).await, args.json),
        Command::Creator { wallet } => emit(scanner.creator_trust_scan(wallet).await, args.json),
        Command::Clusters { wallet } => emit(scanner.creator_cluster_stats(wallet).await, args.json),
    };

    std::process::exit(code);
}
