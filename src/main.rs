use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

mod config;
mod data;
mod error;
mod figures;
mod layout;
mod models;
mod palette;
mod render;
mod server;
mod snapshot;
mod tables;

use config::Cli;
use snapshot::DashboardSnapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!(
        data_dir = %cli.data_dir.display(),
        host = %cli.host,
        port = cli.port,
        stylesheet = %cli.stylesheet,
        "Starting briefing dashboard"
    );

    // No partial dashboard is ever served.
    let snapshot = match DashboardSnapshot::load(&cli.data_dir, &cli.build_options()) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::error!(error = %err, "Dashboard could not be built");
            eprintln!("--- ERROR: {err} ---");
            if err.is_data_problem() {
                eprintln!("Did you run the data preparation step first?");
            }
            std::process::exit(1);
        }
    };

    tracing::info!(graphs = ?snapshot.graph_ids(), "Composed briefing");

    if let Some(out) = &cli.render_only {
        std::fs::write(out, snapshot.html.as_bytes())
            .with_context(|| format!("failed to write {}", out.display()))?;
        println!("Briefing written to {}.", out.display());
        return Ok(());
    }

    server::run_server(Arc::new(snapshot), cli.server_config()).await
}
