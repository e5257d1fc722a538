//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{self, Analysis, AnalysisConfig};
use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;
use crate::ports::data_port::BarSource;

#[derive(Parser, Debug)]
#[command(name = "barstat", about = "Time-series statistics over OHLCV bars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute moving averages, equity curve, drawdown and returns for a bar file
    Analyze {
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze { bars, config } => run_analyze(&bars, config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<AnalysisConfig, BarstatError> {
    FileConfigAdapter::from_file(path)?.analysis_config()
}

fn run_analyze(bars_path: &PathBuf, config_path: Option<&PathBuf>) -> Result<(), BarstatError> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => AnalysisConfig::default(),
    };

    eprintln!("Loading bars from {}", bars_path.display());
    let bars = CsvAdapter::new(bars_path.clone()).load_bars()?;
    let analysis = analysis::analyze(&bars, &config)?;

    print!("{}", format_summary(&bars, &config, &analysis));
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), BarstatError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    eprintln!("{config:#?}");
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.4}"),
        _ => "n/a".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

/// Plain-text summary of an analysis run.
pub fn format_summary(bars: &[Bar], config: &AnalysisConfig, analysis: &Analysis) -> String {
    let mut out = String::new();
    let symbol = bars.first().map(|b| b.symbol.as_str()).unwrap_or("?");
    let first = bars.first().map(|b| b.date.as_str()).unwrap_or("?");
    let last = bars.last().map(|b| b.date.as_str()).unwrap_or("?");
    let calculator = config.return_calculator();

    let _ = writeln!(out, "Symbol:            {symbol}");
    let _ = writeln!(out, "Bars:              {} ({first} .. {last})", bars.len());
    let _ = writeln!(
        out,
        "{:<18} {}",
        format!("{}:", analysis.twma.indicator_type),
        fmt_value(analysis.twma.last())
    );
    let vwma_label = format!("VWMA({}):", config.vwma_window);
    let _ = writeln!(
        out,
        "{:<18} {}",
        vwma_label,
        fmt_value(analysis.vwma.as_ref().and_then(|s| s.last()))
    );
    let _ = writeln!(
        out,
        "Final equity:      {}",
        fmt_value(analysis.equity.last().copied())
    );
    let _ = writeln!(out, "Max drawdown:      {}", fmt_pct(analysis.max_drawdown));
    let returns = analysis.returns.as_ref();
    let _ = writeln!(
        out,
        "Cumulative return: {}",
        fmt_pct(returns.map(|r| r.cumulative_return))
    );
    let _ = writeln!(
        out,
        "Avg period return: {}",
        fmt_pct(returns.map(|r| r.avg_period_return))
    );
    let _ = writeln!(
        out,
        "Annualized return: {} ({}, {} periods/year)",
        fmt_pct(returns.map(|r| r.annualized_return)),
        calculator.annualization(),
        calculator.periods_per_year()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_with_config() {
        let cli = Cli::try_parse_from([
            "barstat", "analyze", "--bars", "data.csv", "--config", "a.ini",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze { bars, config } => {
                assert_eq!(bars, PathBuf::from("data.csv"));
                assert_eq!(config, Some(PathBuf::from("a.ini")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_bars() {
        assert!(Cli::try_parse_from(["barstat", "analyze"]).is_err());
    }

    #[test]
    fn fmt_value_hides_sentinel() {
        assert_eq!(fmt_value(Some(f64::NAN)), "n/a");
        assert_eq!(fmt_value(None), "n/a");
        assert_eq!(fmt_value(Some(1.5)), "1.5000");
    }

    #[test]
    fn fmt_pct_scales() {
        assert_eq!(fmt_pct(Some(0.2)), "20.00%");
        assert_eq!(fmt_pct(None), "n/a");
    }
}
