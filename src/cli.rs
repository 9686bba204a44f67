//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest_for_code};
use crate::domain::config_validation::{
    parse_annualization, parse_commission, parse_optional_date, parse_periods_per_year,
    parse_window, validate_backtest_config, validate_data_config,
};
use crate::domain::error::MacrossError;
use crate::domain::metrics::Metric;
use crate::domain::price_series::PriceSeries;
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "macross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Fast SMA window
        #[arg(long)]
        fast: Option<usize>,
        /// Slow SMA window
        #[arg(long)]
        slow: Option<usize>,
        /// Fraction subtracted from each trade's profit
        #[arg(long, allow_hyphen_values = true)]
        commission: Option<f64>,
        #[arg(long)]
        periods_per_year: Option<u32>,
        /// mean_power or compounded
        #[arg(long)]
        annualization: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Also print every trade
        #[arg(long)]
        trades: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show data range for a symbol
    Info {
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Command-line values layered over the INI file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub code: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub fast: Option<usize>,
    pub slow: Option<usize>,
    pub commission: Option<f64>,
    pub periods_per_year: Option<u32>,
    pub annualization: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            code,
            data_dir,
            fast,
            slow,
            commission,
            periods_per_year,
            annualization,
            start,
            end,
            trades,
        } => {
            let overrides = Overrides {
                code,
                data_dir,
                fast,
                slow,
                commission,
                periods_per_year,
                annualization,
                start,
                end,
            };
            run_backtest(config.as_ref(), &overrides, trades)
        }
        Command::ListSymbols { config, data_dir } => {
            let overrides = Overrides {
                data_dir,
                ..Overrides::default()
            };
            run_list_symbols(config.as_ref(), &overrides)
        }
        Command::Info {
            code,
            config,
            data_dir,
        } => {
            let overrides = Overrides {
                code,
                data_dir,
                ..Overrides::default()
            };
            run_info(config.as_ref(), &overrides)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

/// Loads the INI file when given, otherwise starts from an empty config, then
/// applies `overrides`.
pub fn load_config(
    path: Option<&PathBuf>,
    overrides: &Overrides,
) -> Result<FileConfigAdapter, MacrossError> {
    let mut adapter = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|e| MacrossError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::empty(),
    };
    apply_overrides(&mut adapter, overrides);
    Ok(adapter)
}

pub fn apply_overrides(adapter: &mut FileConfigAdapter, overrides: &Overrides) {
    adapter.set("backtest", "code", overrides.code.clone());
    adapter.set(
        "data",
        "dir",
        overrides.data_dir.as_ref().map(|p| p.display().to_string()),
    );
    adapter.set("backtest", "fast_window", overrides.fast.map(|v| v.to_string()));
    adapter.set("backtest", "slow_window", overrides.slow.map(|v| v.to_string()));
    adapter.set("backtest", "commission", overrides.commission.map(|v| v.to_string()));
    adapter.set(
        "backtest",
        "periods_per_year",
        overrides.periods_per_year.map(|v| v.to_string()),
    );
    adapter.set("backtest", "annualization", overrides.annualization.clone());
    adapter.set("backtest", "start_date", overrides.start.clone());
    adapter.set("backtest", "end_date", overrides.end.clone());
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, MacrossError> {
    Ok(BacktestConfig {
        fast_window: parse_window(adapter, "fast_window")?,
        slow_window: parse_window(adapter, "slow_window")?,
        commission: parse_commission(adapter)?,
        periods_per_year: parse_periods_per_year(adapter)?,
        annualization: parse_annualization(adapter)?,
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
    })
}

pub fn resolve_code(adapter: &dyn ConfigPort) -> Option<String> {
    adapter
        .get_string("backtest", "code")
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

pub fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvAdapter, MacrossError> {
    validate_data_config(adapter)?;
    let dir = adapter.get_string("data", "dir").unwrap_or_default();
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

fn run_backtest(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
    show_trades: bool,
) -> Result<(), MacrossError> {
    let adapter = load_config(config_path, overrides)?;
    validate_backtest_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let code = resolve_code(&adapter).ok_or_else(|| MacrossError::ConfigMissing {
        section: "backtest".into(),
        key: "code".into(),
    })?;
    let data_port = build_data_port(&adapter)?;

    let output = run_backtest_pipeline(&data_port, &code, &bt_config, show_trades)?;
    print!("{}", output);
    Ok(())
}

/// Fetches, backtests and renders the console report for one code.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    code: &str,
    bt_config: &BacktestConfig,
    show_trades: bool,
) -> Result<String, MacrossError> {
    tracing::info!(
        code,
        fast = bt_config.fast_window,
        slow = bt_config.slow_window,
        commission = bt_config.commission,
        "running backtest"
    );

    let (series, result) = run_backtest_for_code(data_port, code, bt_config)?;

    let mut output = format_summary(code, &series, &result, bt_config);
    if show_trades {
        output.push('\n');
        output.push_str(&format_trades(&result.trades));
    }
    Ok(output)
}

pub fn format_metric_pct(metric: &Metric) -> String {
    match metric {
        Ok(v) => format!("{:.2}%", v * 100.0),
        Err(reason) => format!("undefined ({})", reason),
    }
}

pub fn format_metric_ratio(metric: &Metric) -> String {
    match metric {
        Ok(v) => format!("{:.2}", v),
        Err(reason) => format!("undefined ({})", reason),
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn format_summary(
    code: &str,
    series: &PriceSeries,
    result: &BacktestResult,
    bt_config: &BacktestConfig,
) -> String {
    let p = &result.performance;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== {}: {} / {} ===",
        code, result.indicators.fast.indicator_type, result.indicators.slow.indicator_type
    );
    let _ = writeln!(
        out,
        "Period:            {} to {} ({} bars)",
        format_date(series.first_date()),
        format_date(series.last_date()),
        series.len()
    );
    let _ = writeln!(
        out,
        "Warmup:            {} bars",
        result.indicators.slow.warmup().max(result.indicators.fast.warmup())
    );
    let _ = writeln!(out, "Commission:        {}", bt_config.commission);
    let _ = writeln!(out, "Trades:            {}", p.trade_count);
    let _ = writeln!(out, "Win Rate:          {}", format_metric_pct(&p.win_rate));
    let _ = writeln!(
        out,
        "Profit Factor:     {}",
        format_metric_ratio(&p.profit_factor)
    );
    let _ = writeln!(
        out,
        "Annual Return:     {}",
        format_metric_pct(&p.annual_return)
    );
    let _ = writeln!(
        out,
        "Compounded Annual: {}",
        format_metric_pct(&p.compounded_annual_return)
    );
    let _ = writeln!(out, "Volatility:        {}", format_metric_pct(&p.volatility));
    let _ = writeln!(
        out,
        "Sharpe Ratio:      {} ({})",
        format_metric_ratio(&p.sharpe_ratio),
        bt_config.annualization
    );
    let _ = writeln!(
        out,
        "Total Return:      {}",
        format_metric_pct(&p.total_return)
    );
    let _ = writeln!(
        out,
        "Max Drawdown:      {}",
        format_metric_pct(&p.max_drawdown.map(|dd| -dd))
    );
    out
}

pub fn format_trades(trades: &[Trade]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12}{:>12}  {:<12}{:>12}{:>6}{:>10}",
        "Entry", "Price", "Exit", "Price", "Days", "Profit"
    );
    for t in trades {
        let _ = writeln!(
            out,
            "{:<12}{:>12.2}  {:<12}{:>12.2}{:>6}{:>9.2}%",
            t.entry_date.to_string(),
            t.entry_price,
            t.exit_date.to_string(),
            t.exit_price,
            t.holding_days(),
            t.profit * 100.0
        );
    }
    out
}

fn run_list_symbols(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
) -> Result<(), MacrossError> {
    let adapter = load_config(config_path, overrides)?;
    let data_port = build_data_port(&adapter)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: Option<&PathBuf>, overrides: &Overrides) -> Result<(), MacrossError> {
    let adapter = load_config(config_path, overrides)?;
    let code = resolve_code(&adapter).ok_or_else(|| MacrossError::ConfigMissing {
        section: "backtest".into(),
        key: "code".into(),
    })?;
    let data_port = build_data_port(&adapter)?;

    println!("{}", describe_data_range(&data_port, &code)?);
    Ok(())
}

pub fn describe_data_range(data_port: &dyn DataPort, code: &str) -> Result<String, MacrossError> {
    Ok(match data_port.get_data_range(code)? {
        Some((min_date, max_date, count)) => {
            format!("{}: {} bars, {} to {}", code, count, min_date, max_date)
        }
        None => format!("{}: no data found", code),
    })
}
