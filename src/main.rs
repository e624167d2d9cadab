use calculators::{CalcError, StockEntry};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Config, LogFormat};
use core_types::{number_or_zero, parse_number, PivotMethod};
use indicatif::{ProgressBar, ProgressStyle};
use news::{run_news_poller, NewsService, NewsUpdate};
use panels::{format_grouped, render_html, render_text, IntoPanel};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// The main entry point for the finkit application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => configuration::load_config_from(path)?,
        None => configuration::load_config()?,
    };
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    let _guard = configuration::init_tracing(&config.logging)?;

    let format = cli.format;
    match cli.command {
        Commands::Average(args) => handle_average(args, format),
        Commands::Target(args) => emit(
            calculators::target_average(
                lenient(&args.quantity),
                lenient(&args.current_average),
                lenient(&args.new_price),
                lenient(&args.desired_average),
            ),
            format,
        ),
        Commands::Roi(args) => emit(
            calculators::roi(optional(&args.invested), optional(&args.current)),
            format,
        ),
        Commands::RoiAdvanced(args) => emit(
            calculators::advanced_roi(
                lenient(&args.invested),
                lenient(&args.current),
                lenient(&args.charges),
                lenient(&args.flat),
            ),
            format,
        ),
        Commands::Emi(args) => emit(
            calculators::emi(lenient(&args.principal), lenient(&args.rate), lenient(&args.months)),
            format,
        ),
        Commands::Percent(args) => emit(
            calculators::percentage(optional(&args.percent), optional(&args.of)),
            format,
        ),
        Commands::Sip(args) => emit(
            calculators::sip(lenient(&args.amount), lenient(&args.rate), lenient(&args.years)),
            format,
        ),
        Commands::Lumpsum(args) => emit(
            calculators::lumpsum(lenient(&args.amount), lenient(&args.rate), lenient(&args.years)),
            format,
        ),
        Commands::Swp(args) => emit(
            calculators::swp(
                lenient(&args.corpus),
                lenient(&args.withdrawal),
                lenient(&args.rate),
                lenient(&args.years),
            ),
            format,
        ),
        Commands::Cagr(args) => emit(
            calculators::cagr(lenient(&args.initial), lenient(&args.final_value), lenient(&args.years)),
            format,
        ),
        Commands::Pivot(args) => handle_pivot(args, format),
        Commands::News(args) => handle_news(args, format, &config).await,
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or(config.server.addr);
            web_server::run_server(addr, &config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Everyday investing calculators and a market-news ticker.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read settings from this file instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// How results are printed.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// A terminal table.
    Table,
    /// The HTML fragment the web pages use.
    Html,
    /// The raw report and panel as JSON.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Average buy price across several purchases.
    Average(AverageArgs),
    /// Shares to buy at a new price to reach a desired average.
    Target(TargetArgs),
    /// Return on investment.
    Roi(RoiArgs),
    /// Return on investment after brokerage and fixed charges.
    RoiAdvanced(AdvancedRoiArgs),
    /// Monthly instalment for a loan.
    Emi(EmiArgs),
    /// A percentage of a value.
    Percent(PercentArgs),
    /// Future value of a monthly SIP.
    Sip(GrowthArgs),
    /// Future value of a one-time investment.
    Lumpsum(GrowthArgs),
    /// Systematic withdrawals from a corpus.
    Swp(SwpArgs),
    /// Compound annual growth rate.
    Cagr(CagrArgs),
    /// Support and resistance levels from the previous session.
    Pivot(PivotArgs),
    /// Latest market headlines.
    News(NewsArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

// Numeric arguments are taken as text and read leniently: "1,000" is 1,
// "12abc" is 12, and anything unreadable counts as missing.

#[derive(Parser)]
struct AverageArgs {
    /// A purchase, as QUANTITY@PRICE. Repeat for each row.
    #[arg(long = "entry", value_name = "QTY@PRICE")]
    entries: Vec<String>,
}

#[derive(Parser)]
struct TargetArgs {
    /// Shares currently held.
    #[arg(long)]
    quantity: Option<String>,
    /// Current average buy price.
    #[arg(long)]
    current_average: Option<String>,
    /// Price the new shares would be bought at.
    #[arg(long)]
    new_price: Option<String>,
    /// The average to reach.
    #[arg(long)]
    desired_average: Option<String>,
}

#[derive(Parser)]
struct RoiArgs {
    #[arg(long)]
    invested: Option<String>,
    /// Current or final value.
    #[arg(long)]
    current: Option<String>,
}

#[derive(Parser)]
struct AdvancedRoiArgs {
    #[arg(long)]
    invested: Option<String>,
    #[arg(long)]
    current: Option<String>,
    /// Charges as a percentage of turnover (buy plus sell value).
    #[arg(long)]
    charges: Option<String>,
    /// Flat charges per trade.
    #[arg(long)]
    flat: Option<String>,
}

#[derive(Parser)]
struct EmiArgs {
    #[arg(long)]
    principal: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    rate: Option<String>,
    /// Tenure in months.
    #[arg(long)]
    months: Option<String>,
}

#[derive(Parser)]
struct PercentArgs {
    #[arg(long)]
    percent: Option<String>,
    /// The value the percentage is taken of.
    #[arg(long)]
    of: Option<String>,
}

#[derive(Parser)]
struct GrowthArgs {
    /// The monthly instalment (sip) or the one-time amount (lumpsum).
    #[arg(long)]
    amount: Option<String>,
    /// Expected annual return in percent.
    #[arg(long)]
    rate: Option<String>,
    #[arg(long)]
    years: Option<String>,
}

#[derive(Parser)]
struct SwpArgs {
    #[arg(long)]
    corpus: Option<String>,
    /// Monthly withdrawal.
    #[arg(long)]
    withdrawal: Option<String>,
    /// Expected annual return in percent.
    #[arg(long)]
    rate: Option<String>,
    #[arg(long)]
    years: Option<String>,
}

#[derive(Parser)]
struct CagrArgs {
    #[arg(long)]
    initial: Option<String>,
    #[arg(long = "final")]
    final_value: Option<String>,
    #[arg(long)]
    years: Option<String>,
}

#[derive(Parser)]
struct PivotArgs {
    #[arg(long)]
    high: Option<String>,
    #[arg(long)]
    low: Option<String>,
    #[arg(long)]
    close: Option<String>,
    #[arg(long)]
    open: Option<String>,
    /// classic, woodie, camarilla or fibonacci.
    #[arg(long, default_value = "classic")]
    method: String,
}

#[derive(Parser)]
struct NewsArgs {
    /// Keep running and print every refresh.
    #[arg(long)]
    watch: bool,
    /// Shorthand for `--format html`.
    #[arg(long)]
    html: bool,
    /// Print the scrolling-ticker form instead of the full listing.
    #[arg(long)]
    ticker: bool,
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address; defaults to `server.addr` from the configuration.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Calculator Commands
// ==============================================================================

fn lenient(raw: &Option<String>) -> Decimal {
    number_or_zero(raw.as_deref())
}

fn optional(raw: &Option<String>) -> Option<Decimal> {
    parse_number(raw.as_deref())
}

/// Splits `QTY@PRICE`. A missing part counts as zero.
fn parse_entry(raw: &str) -> StockEntry {
    let (quantity, price) = match raw.split_once('@') {
        Some((q, p)) => (q, Some(p)),
        None => (raw, None),
    };
    StockEntry::new(number_or_zero(Some(quantity)), number_or_zero(price))
}

/// Prints a calculator result in the chosen format. Incomplete input prints
/// nothing, the same way the page hides its result box.
fn emit<R: IntoPanel + Serialize>(result: Result<R, CalcError>, format: OutputFormat) -> anyhow::Result<()> {
    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_incomplete() => {
            tracing::info!(reason = %e, "Nothing to show.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let panel = report.to_panel();
    match format {
        OutputFormat::Table => println!("{}", render_text(&panel)),
        OutputFormat::Html => println!("{}", render_html(&panel)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "report": report, "panel": panel }))?
        ),
    }
    Ok(())
}

fn handle_average(args: AverageArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries: Vec<StockEntry> = args.entries.iter().map(|e| parse_entry(e)).collect();

    if format == OutputFormat::Table && !entries.is_empty() {
        let mut rows = Table::new();
        rows.load_preset(UTF8_FULL)
            .set_header(vec!["#", "Quantity", "Price", "Invested"]);
        for (i, entry) in entries.iter().enumerate() {
            rows.add_row(vec![
                (i + 1).to_string(),
                entry.quantity.normalize().to_string(),
                entry.price.normalize().to_string(),
                format_grouped(entry.invested()),
            ]);
        }
        println!("{rows}");
    }

    emit(calculators::stock_average(&entries), format)
}

fn handle_pivot(args: PivotArgs, format: OutputFormat) -> anyhow::Result<()> {
    let method: PivotMethod = args.method.parse()?;
    emit(
        calculators::pivot_points(
            lenient(&args.high),
            lenient(&args.low),
            lenient(&args.close),
            lenient(&args.open),
            method,
        ),
        format,
    )
}

// ==============================================================================
// News Command
// ==============================================================================

fn print_news(update: &NewsUpdate, format: OutputFormat, ticker: bool) -> anyhow::Result<()> {
    let items = update.items();
    let now = chrono::Utc::now();
    match (format, ticker) {
        (OutputFormat::Json, _) => println!("{}", serde_json::to_string_pretty(update)?),
        (OutputFormat::Html, true) if items.is_empty() => println!("{}", panels::unavailable_html()),
        (OutputFormat::Html, true) => println!("{}", panels::render_ticker_html(items)),
        (OutputFormat::Html, false) => println!("{}", panels::render_news_cards_html(items, now)),
        (OutputFormat::Table, true) => println!("{}", panels::render_ticker_line(items)),
        (OutputFormat::Table, false) if items.is_empty() => println!("{}", panels::UNAVAILABLE_MESSAGE),
        (OutputFormat::Table, false) => println!("{}", panels::render_news_table(items, now)),
    }
    Ok(())
}

/// Fetches the headlines once, or keeps polling with `--watch` until Ctrl+C.
async fn handle_news(args: NewsArgs, format: OutputFormat, config: &Config) -> anyhow::Result<()> {
    let format = if args.html { OutputFormat::Html } else { format };
    let service = Arc::new(NewsService::from_config(&config.news)?);

    if !args.watch {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        spinner.set_message("Fetching market news...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let update = service.refresh(chrono::Utc::now()).await;
        spinner.finish_and_clear();

        return print_news(&update, format, args.ticker);
    }

    let (tx, mut rx) = broadcast::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller = tokio::spawn(run_news_poller(
        service,
        tx,
        config.news.poll_interval,
        shutdown_rx,
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping news watch.");
                break;
            }
            update = rx.recv() => match update {
                Ok(update) => print_news(&update, format, args.ticker)?,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("News watch lagged, skipped {} updates.", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    let _ = shutdown_tx.send(());
    poller.await?;
    Ok(())
}
