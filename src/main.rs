use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use contest_dashboard::aggregator::{summarize, WindowSummary};
use contest_dashboard::config::Config;
use contest_dashboard::error::Result;
use contest_dashboard::fetcher::fetch_records;
use contest_dashboard::now_secs;
use contest_dashboard::report::{format_total, Report};
use contest_dashboard::types::WindowMode;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let client = cfg.http_client()?;
    let (records, _stats) = fetch_records(&client, &cfg).await;

    if records.is_empty() {
        warn!("No contest data available");
        println!("Loading...");
        return Ok(());
    }

    let now = now_secs();

    let report = Report::build(&records, now, cfg.window_mode, cfg.recent_limit);
    // Selected mode first, then the other one for comparison.
    let other = summarize(&records, now, cfg.window_mode.toggle());
    for summary in [&report.summary, &other] {
        log_summary(summary);
        print_summary(summary);
    }

    println!();
    println!("Last {} Contest", report.recent.len());
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10}",
        "Time", "Bids", "Stars", "Multiplier", "Prize"
    );
    for row in &report.recent {
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>10}",
            row.clock, row.bids, row.stars, row.multiplier, row.prize
        );
    }

    Ok(())
}

fn print_summary(s: &WindowSummary) {
    let span = s.mode.span_label();
    println!(
        "{:<7} Bids ({span}): {} {}   Points ({span}): {} {}",
        s.mode.to_string(),
        format_total(s.bids_total),
        s.bids_rate,
        format_total(s.points_total),
        s.points_rate,
    );
}

fn log_summary(s: &WindowSummary) {
    info!(
        event = "WINDOW_SUMMARY",
        mode = %s.mode,
        current = s.current_count,
        previous = s.previous_count,
        bids = s.bids_total,
        bids_rate = %s.bids_rate,
        points = s.points_total,
        points_rate = %s.points_rate,
        unbounded = s.bids_rate.is_unbounded() || s.points_rate.is_unbounded(),
        "{} window | bids: {} ({}) | points: {} ({})",
        s.mode,
        format_total(s.bids_total),
        s.bids_rate,
        format_total(s.points_total),
        s.points_rate,
    );
    if s.mode == WindowMode::Daily && s.current_count == 0 {
        warn!("No contests in the last 24h; the feed may be stale");
    }
}
