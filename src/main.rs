use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use mapato::api::{GeminiClient, InsightProvider};
use mapato::data::ReportRepository;
use mapato::models::Config;
use mapato::ui;

#[derive(Parser)]
#[command(name = "mapato")]
#[command(about = "Mapato Bora - NSE strategic investment dashboard")]
#[command(version)]
struct Args {
    /// Run without AI commentary (no GEMINI_API_KEY needed)
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Only errors reach the log while the terminal is in raw mode,
    // anything chattier corrupts the display.
    tracing_subscriber::fmt()
        .with_max_level(Level::ERROR)
        .init();

    let provider: Option<Arc<dyn InsightProvider>> = if args.offline {
        None
    } else {
        match Config::from_env() {
            Ok(config) => Some(Arc::new(GeminiClient::new(&config)?)),
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("Set GEMINI_API_KEY in the environment or a .env file, or rerun with --offline.");
                std::process::exit(1);
            }
        }
    };

    let repo = ReportRepository::with_seed_data();
    ui::run(repo, provider).await
}
