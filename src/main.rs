use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobtrack::api;
use jobtrack_core::report::{self, ReportFormat};
use jobtrack_core::{Store, Tracker};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Personal job-application tracker")]
struct Cli {
    /// Path to the local store file (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Write the export document
    Report {
        /// Report layout: detailed or compact
        #[arg(long, default_value = "detailed")]
        format: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "jobtrack=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let store = open_store(&cli)?;
    let tracker = Tracker::new(store);

    match cli.command {
        Some(Commands::Serve { port }) => serve(tracker, port).await?,
        Some(Commands::Report { format, out }) => write_report(&tracker, &format, out)?,
        None => serve(tracker, 3000).await?,
    }

    Ok(())
}

fn open_store(cli: &Cli) -> anyhow::Result<Store> {
    let store = if cli.memory {
        Store::in_memory()?
    } else if let Some(path) = &cli.db {
        Store::open(path)?
    } else {
        Store::open_default()?
    };
    Ok(store)
}

async fn serve(tracker: Tracker, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting jobtrack server on port {}", port);

    let app = api::create_router(tracker);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("jobtrack server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn write_report(tracker: &Tracker, format: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    let format = ReportFormat::from_str(format)
        .ok_or_else(|| anyhow::anyhow!("unknown report format '{format}'"))?;

    let apps = tracker.list_applications()?;
    let history = tracker.list_history()?;
    let text = report::render(&apps, &history, format, Utc::now());

    match out {
        Some(path) => {
            std::fs::write(&path, &text)?;
            tracing::info!("wrote report to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
