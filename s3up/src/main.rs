use clap::Parser;
use s3up::cli::{normalise_args, run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    // stdout carries the per-file result lines, so logs go to stderr and stay
    // silent unless RUST_LOG asks for them.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse_from(normalise_args(std::env::args_os()));
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(summary) => tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "CLI completed"
        ),
        Err(e) => {
            tracing::debug!(error = %e, "CLI exited with error");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
