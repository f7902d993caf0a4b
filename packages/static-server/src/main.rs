use anyhow::Context;
use nserve_config::constants::NSERVE_LOG;
use nserve_static::{StaticServer, StaticServerConfig, WorkerArgs};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Output goes to stdout, which the supervisor captures into its log files
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(NSERVE_LOG).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let args = WorkerArgs::parse(std::env::args().skip(1), cwd);

    info!("Starting server with directory: {}", args.directory.display());
    info!("Directory exists: {}", args.directory.exists());
    match std::fs::read_dir(&args.directory) {
        Ok(entries) => {
            let count = entries.filter_map(Result::ok).count();
            info!("Directory holds {} entries", count);
            info!(
                "index.html exists: {}",
                args.directory.join("index.html").is_file()
            );
        }
        Err(e) => error!("Error reading directory: {}", e),
    }

    StaticServer::new(StaticServerConfig::new(args.directory, args.port))
        .start()
        .await
        .with_context(|| format!("Static server on port {} stopped", args.port))
}
