//! FreakyFashion: admin backend for the product catalog.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("FREAKY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Some(arg) = args.get(1) {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                println!("FreakyFashion: catalog admin server");
                println!();
                println!("Usage: freaky");
                println!();
                println!("Environment:");
                println!("  PORT              HTTP port (default 3000)");
                println!("  FREAKY_DATA_DIR   Data directory (default ./data)");
                println!("  RUST_LOG          Log filter (default info)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}. Use 'freaky help' for usage.", arg);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = freaky_core::FreakyConfig::from_env(&data_dir)?;
    let port = config.port;

    let store = freaky_store::SqliteStore::open(&config.data_paths.database)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let state = Arc::new(AppState::new(config, store));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FreakyFashion server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
