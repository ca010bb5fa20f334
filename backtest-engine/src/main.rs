use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crossover_backtest::sweep::{self, SweepPoint};
use crossover_backtest::{
    generate_synthetic_bars, load_file, Backtest, BacktestParameters, BacktestResult, PriceTable,
    StrategyKind,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Sma,
    Ema,
}

#[derive(Parser, Debug)]
#[command(name = "crossover-backtest")]
#[command(version = "0.1.0")]
#[command(about = "Single-asset moving-average crossover backtester", long_about = None)]
struct Args {
    /// Data file path (CSV/JSON). If not provided, uses synthetic data.
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// JSON parameter file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial cash
    #[arg(long)]
    cash: Option<f64>,

    /// Commission rate (0.003 = 0.3%)
    #[arg(long)]
    commission: Option<f64>,

    /// Bars skipped before the strategy starts trading
    #[arg(long)]
    warmup: Option<usize>,

    /// Strategy family
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Fast moving average window
    #[arg(long)]
    fast: Option<usize>,

    /// Slow moving average window
    #[arg(long)]
    slow: Option<usize>,

    /// Number of synthetic bars
    #[arg(long, default_value = "500")]
    bars: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "100.0")]
    initial_price: f64,

    /// Seed for synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// Fast windows to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    sweep_fast: Vec<usize>,

    /// Slow windows to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    sweep_slow: Vec<usize>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crossover_backtest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let params = build_params(&args)?;

    // Load or generate data
    let table = if let Some(path) = &args.data_file {
        info!(path = %path.display(), "loading data");
        load_file(path)?
    } else {
        info!(
            bars = args.bars,
            initial_price = args.initial_price,
            "generating synthetic data"
        );
        PriceTable::from_bars(&generate_synthetic_bars(
            args.bars,
            args.initial_price,
            args.seed,
        ))
    };

    if !args.sweep_fast.is_empty() || !args.sweep_slow.is_empty() {
        let (fast, slow) = params.strategy.windows();
        let fast_grid = non_empty_or(&args.sweep_fast, fast);
        let slow_grid = non_empty_or(&args.sweep_slow, slow);
        let points = sweep::run_grid(&table, &params, &fast_grid, &slow_grid)?;
        return emit(&args, points.as_slice(), print_sweep_report);
    }

    let result = Backtest::from_params(&table, &params)?.run()?;
    emit(&args, &result, print_text_report)
}

fn build_params(args: &Args) -> Result<BacktestParameters> {
    let mut params = match &args.config {
        Some(path) => BacktestParameters::from_json_file(path)?,
        None => BacktestParameters::default(),
    };

    if let Some(cash) = args.cash {
        params = params.with_cash(cash);
    }
    if let Some(commission) = args.commission {
        params = params.with_commission(commission);
    }
    if let Some(warmup) = args.warmup {
        params = params.with_warmup(warmup);
    }

    let (fast, slow) = params.strategy.windows();
    let (fast, slow) = (args.fast.unwrap_or(fast), args.slow.unwrap_or(slow));
    let strategy = match args.strategy {
        Some(StrategyArg::Sma) => StrategyKind::SmaCross { fast, slow },
        Some(StrategyArg::Ema) => StrategyKind::EmaCross { fast, slow },
        None => params.strategy.with_windows(fast, slow),
    };

    Ok(params.with_strategy(strategy))
}

fn non_empty_or(values: &[usize], fallback: usize) -> Vec<usize> {
    if values.is_empty() {
        vec![fallback]
    } else {
        values.to_vec()
    }
}

fn emit<T: serde::Serialize + ?Sized>(args: &Args, value: &T, text: fn(&T)) -> Result<()> {
    match args.output.as_str() {
        "json" => {
            let json = if args.pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            println!("{}", json);
        }
        "text" => text(value),
        other => {
            warn!(format = other, "unknown output format, using text");
            text(value);
        }
    }
    Ok(())
}

fn print_text_report(result: &BacktestResult) {
    println!();
    println!("================================================================");
    println!("  BACKTEST REPORT - {}", result.strategy);
    println!("================================================================");
    println!();
    println!("  Period: {} to {}", result.start.date_naive(), result.end.date_naive());
    println!(
        "  Bars simulated: {} (warm-up {})",
        result.bars_processed, result.warmup
    );
    println!();
    println!("----------------------------------------------------------------");
    println!("  RESULT");
    println!("----------------------------------------------------------------");
    println!("  Initial Value:    ${:>12.2}", result.initial_market_value);
    println!("  Ending Value:     ${:>12.2}", result.ending_market_value);
    println!(
        "  Profit/Loss:      ${:>12.2} ({:+.2}%)",
        result.profit_or_loss, result.summary.return_pct
    );
    println!(
        "  Max Drawdown:     {:>12.2}%",
        result.summary.max_drawdown_pct
    );
    println!(
        "  Trades:           {:>12} ({} buys, {} sells)",
        result.trades.len(),
        result.summary.buys,
        result.summary.sells
    );
    println!();
    println!("================================================================");

    if !result.trades.is_empty() {
        println!();
        println!("  RECENT TRADES (last 5)");
        println!("----------------------------------------------------------------");
        for trade in result.trades.iter().rev().take(5) {
            println!(
                "  {} | {:?} {:.4} @ {:.2} | cash ${:.2}",
                trade.timestamp.format("%Y-%m-%d"),
                trade.side,
                trade.quantity,
                trade.price,
                trade.cash_after
            );
        }
        println!();
    }
}

fn print_sweep_report(points: &[SweepPoint]) {
    println!();
    println!("  PARAMETER SWEEP ({} points)", points.len());
    println!("----------------------------------------------------------------");
    println!("  {:>6} {:>6} {:>14} {:>14} {:>7}", "fast", "slow", "ending", "p&l", "trades");
    for p in points {
        println!(
            "  {:>6} {:>6} {:>14.2} {:>14.2} {:>7}",
            p.fast, p.slow, p.ending_market_value, p.profit_or_loss, p.trades
        );
    }
    if let Some(top) = sweep::best(points) {
        println!("----------------------------------------------------------------");
        println!("  Best: fast={} slow={} p&l=${:.2}", top.fast, top.slow, top.profit_or_loss);
    }
    println!();
}
