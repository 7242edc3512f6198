//! dirsync — reconcile a remote directory against a desired-state feed.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dirsync_client::HttpGateway;
use dirsync_core::SyncConfig;
use dirsync_reconcile::Engine;

mod feed;

fn print_usage() {
    println!("dirsync — reconcile a remote directory against a desired-state feed");
    println!();
    println!("Usage: dirsync <command>");
    println!();
    println!("Commands:");
    println!("  <feed.json>              Reconcile the directory and sweep stale entries");
    println!("  validate <feed.json>     Parse the feed without contacting the directory");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  DIRSYNC_API_URL          Directory API base URL (required)");
    println!("  DIRSYNC_API_KEY          Directory API key (required)");
    println!("  DIRSYNC_API_KEY_HEADER   Header carrying the key (default: x-api-key)");
    println!("  DIRSYNC_TIMEOUT_SECS     Request timeout in seconds (default: none)");
    println!("  RUST_LOG                 Log filter (default: info)");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let feed_path = match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--validate" | "validate" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: dirsync validate <feed.json>");
                std::process::exit(1);
            };
            let state = feed::load(&PathBuf::from(path))?;
            println!(
                "{}: {} identities, {} groups",
                path,
                state.identities.len(),
                state.groups.len()
            );
            return Ok(());
        }
        path => PathBuf::from(path),
    };

    let desired = feed::load(&feed_path)?;
    let config = SyncConfig::from_env()?;
    info!("Directory: {}", config.api_url);

    let gateway = HttpGateway::new(&config)?;
    let mut engine = Engine::load(gateway)?;
    info!("Loaded {}", engine);

    let report = engine.run(&desired)?;
    info!(
        "Finished: {} changes, {} failed calls",
        report.changes(),
        report.failed_calls
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
