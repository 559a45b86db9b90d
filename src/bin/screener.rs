//! Command-line screener over the compiled-in research report. Prints
//! the same scored table the dashboard shows, without the terminal UI.

use anyhow::Result;
use clap::{Parser, ValueEnum};

use mapato::data::ReportRepository;
use mapato::query::{self, SortDirection, SortField};
use mapato::models::TimeWindow;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Symbol,
    Price,
    Change,
    Score,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Symbol => SortField::Symbol,
            SortArg::Price => SortField::Price,
            SortArg::Change => SortField::ChangePct,
            SortArg::Score => SortField::Score,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    #[value(name = "24h")]
    Last24h,
    #[value(name = "1w")]
    LastWeek,
    #[value(name = "1m")]
    LastMonth,
}

impl From<WindowArg> for TimeWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Last24h => TimeWindow::Last24h,
            WindowArg::LastWeek => TimeWindow::LastWeek,
            WindowArg::LastMonth => TimeWindow::LastMonth,
        }
    }
}

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Score and filter NSE picks from the command line")]
struct Args {
    /// Substring filter over symbol or sector name
    #[arg(short, long, default_value = "")]
    query: String,

    /// Sort column
    #[arg(short, long, value_enum, default_value_t = SortArg::Score)]
    sort: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// Also print the top pick per sector
    #[arg(long)]
    tops: bool,

    /// Also print alerts within the given window
    #[arg(long, value_enum)]
    alerts: Option<WindowArg>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let repo = ReportRepository::with_seed_data();

    let matches: Vec<_> = query::search(repo.picks(), &args.query)
        .into_iter()
        .cloned()
        .collect();
    let mut rows = query::screener_rows(&matches, repo.weights());
    let direction = if args.asc {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    query::sort_rows(&mut rows, args.sort.into(), direction);

    println!("{:<8} {:<20} {:>10} {:>9} {:>6}", "SYMBOL", "SECTOR", "PRICE", "CHANGE", "SCORE");
    for row in &rows {
        let change = row
            .change_pct
            .map(|c| format!("{:+.1}%", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<20} {:>10.2} {:>9} {:>6}",
            row.symbol,
            row.sector.display_name(),
            row.price,
            change,
            row.score
        );
    }
    println!("{} matches", rows.len());

    if args.tops {
        println!("\nTop pick per sector:");
        for (sector, pick, score) in query::top_pick_per_sector(repo.picks(), repo.weights()) {
            println!("  {:<20} {:<8} score {}", sector.display_name(), pick.symbol, score);
        }
    }

    if let Some(window) = args.alerts {
        let window: TimeWindow = window.into();
        println!("\nAlerts ({}):", window.label());
        for alert in query::filter_alerts(repo.alerts(), window) {
            println!(
                "  [{:<11}] {:<8} {}",
                alert.kind.label(),
                alert.symbol,
                alert.message
            );
        }
    }

    Ok(())
}
