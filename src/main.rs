use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use signaldesk::config::{AppConfig, Session};
use signaldesk::execution::PaperExecution;
use signaldesk::feeds::{SnapshotMarketData, SyntheticMarketData};
use signaldesk::orders::{apply_protective_defaults, OrderIntent, OrderKind, OrderService, Side};
use signaldesk::ports::{MarketDataPort, ThrottledMarketData};
use signaldesk::scanner::SignalScanner;
use signaldesk::{Signal, Timeframe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser)]
#[command(name = "signaldesk")]
#[command(version, about = "RSI and order book scanner for crypto futures")]
struct Cli {
    /// Configuration file (defaults to ./signaldesk.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the market for RSI extremes
    Scan(ScanArgs),
    /// Build and submit a single order
    Order(OrderArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Synthetic,
    Snapshot,
}

#[derive(Args)]
struct ScanArgs {
    #[arg(short, long)]
    timeframe: Option<Timeframe>,

    #[arg(long)]
    overbought: Option<f64>,

    #[arg(long)]
    oversold: Option<f64>,

    /// Where market data comes from
    #[arg(long, value_enum, default_value = "synthetic")]
    source: Source,

    /// Recorded market state, required with `--source snapshot`
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Size of the synthetic symbol universe
    #[arg(long, default_value_t = 24)]
    symbols: usize,

    /// Seed for the synthetic feed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print signals as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OrderArgs {
    #[arg(long)]
    symbol: String,

    #[arg(long)]
    side: Side,

    /// Falls back to trading.default_quantity
    #[arg(long)]
    amount: Option<f64>,

    /// Falls back to trading.default_order_kind
    #[arg(long)]
    kind: Option<OrderKind>,

    /// Limit price for LIMIT, reference price for stop kinds
    #[arg(long)]
    trigger_price: Option<f64>,

    #[arg(long)]
    stop_loss_price: Option<f64>,

    #[arg(long)]
    take_profit_price: Option<f64>,

    #[arg(long)]
    post_only: bool,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

fn format_level(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn print_signals(signals: &[Signal]) {
    if signals.is_empty() {
        println!("No symbols in an RSI extreme");
        return;
    }

    println!(
        "{:<14} {:<11} {:>7} {:>10} {:>14} {:>14} {:>14}",
        "SYMBOL", "ZONE", "RSI", "IMBALANCE", "PRICE", "SUPPORT", "RESISTANCE"
    );
    for signal in signals {
        let imbalance = signal
            .order_book_imbalance
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<14} {:<11} {:>7.2} {:>10} {:>14.4} {:>14} {:>14}",
            signal.symbol,
            signal.zone.to_string(),
            signal.latest_rsi,
            imbalance,
            signal.current_price,
            format_level(signal.support),
            format_level(signal.resistance),
        );
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn run_scan(args: ScanArgs, config: AppConfig) -> Result<()> {
    let mut scan = config.scan.clone();
    if let Some(timeframe) = args.timeframe {
        scan.timeframe = timeframe;
    }
    if let Some(overbought) = args.overbought {
        scan.thresholds.overbought = overbought;
    }
    if let Some(oversold) = args.oversold {
        scan.thresholds.oversold = oversold;
    }

    let market: Arc<dyn MarketDataPort> = match args.source {
        Source::Synthetic => Arc::new(SyntheticMarketData::new(args.seed, args.symbols)),
        Source::Snapshot => {
            let path = args
                .snapshot
                .context("--snapshot FILE is required with --source snapshot")?;
            let feed = SnapshotMarketData::from_path(&path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            Arc::new(feed)
        }
    };

    let market = ThrottledMarketData::new(
        market,
        config.exchange.rate_limit_per_sec,
        config.exchange.request_timeout(),
    )?;
    let scanner = SignalScanner::new(market, scan).context("Invalid scan settings")?;

    let mut signals = scanner.scan().await.context("Scan failed")?;
    signals.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&signals)?);
    } else {
        print_signals(&signals);
    }
    Ok(())
}

async fn run_order(args: OrderArgs, config: AppConfig) -> Result<()> {
    let session = Session::from_env()?;
    if !session.is_authenticated() {
        bail!("No exchange session: set SIGNALDESK_API_KEY, SIGNALDESK_SECRET and SIGNALDESK_PASSPHRASE");
    }
    tracing::debug!(session = ?session, "Using exchange session");

    let trading = &config.trading;
    let amount = args
        .amount
        .or(trading.default_quantity)
        .context("--amount is required when trading.default_quantity is not set")?;

    let mut intent = OrderIntent {
        symbol: args.symbol,
        side: args.side,
        amount,
        kind: args.kind.unwrap_or(trading.default_order_kind),
        trigger_price: args.trigger_price,
        stop_loss_price: args.stop_loss_price,
        take_profit_price: args.take_profit_price,
        post_only: args.post_only.then_some(true),
        leverage: trading.leverage,
        time_in_force: trading.time_in_force,
    };
    apply_protective_defaults(&mut intent, trading.stop_loss_pct, trading.take_profit_pct)?;

    let service = OrderService::new(PaperExecution::new());
    let result = service.place(&intent).await.context("Order failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    setup_logging(&config.logging.level, cli.json_logs || config.logging.json);
    tracing::info!(
        rate_limit = config.exchange.rate_limit_per_sec,
        timeframe = %config.scan.timeframe,
        "signaldesk starting"
    );

    match cli.command {
        Commands::Scan(args) => run_scan(args, config).await,
        Commands::Order(args) => run_order(args, config).await,
    }
}
