//! Sentira CLI and REST API entry point.
//!
//! Binary name: `sentira`
//!
//! Parses CLI arguments, initializes the database and services, then either
//! starts the REST API server or runs a one-shot analytics command.

mod http;
mod state;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sentira_types::report::PeriodType;
use state::AppState;

#[derive(Parser)]
#[command(name = "sentira", version, about = "Affective interaction service")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        #[arg(long, default_value = "127.0.0.1", env = "SENTIRA_HOST")]
        host: String,
        #[arg(long, default_value_t = 8080, env = "SENTIRA_PORT")]
        port: u16,
        /// Bridge tracing spans to an OpenTelemetry stdout exporter
        #[arg(long)]
        otel: bool,
    },
    /// Print a period report for a user as JSON
    Report {
        user: String,
        #[arg(long, default_value = "weekly")]
        period: PeriodType,
    },
    /// Print usage statistics for a user as JSON
    Stats { user: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,sentira=debug",
        _ => "trace",
    };

    match cli.command {
        Commands::Serve { host, port, otel } => {
            sentira_observe::tracing_setup::init_tracing(otel, filter)
                .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

            let state = AppState::init().await?;
            let router = http::router::build_router(state);

            let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
            tracing::info!(%host, port, "listening");
            axum::serve(listener, router).await?;

            sentira_observe::tracing_setup::shutdown_tracing();
        }
        Commands::Report { user, period } => {
            init_fmt_tracing(filter);
            let state = AppState::init().await?;
            let report = state.reports.generate_report(&user, period).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Stats { user } => {
            init_fmt_tracing(filter);
            let state = AppState::init().await?;
            let stats = state.statistics(&user).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn init_fmt_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}
