//! StockLens CLI: indicator, signal, summary and cache commands.
//!
//! Commands:
//! - `compute`: compute indicators and write CSV/JSON snapshots
//! - `signals`: print the latest signals and the trend bias
//! - `summary`: print growth, volatility and data freshness
//! - `cache status`: list cached symbols, date ranges and freshness
//! - `cache remove`: drop cached entries for the given symbols

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use stocklens_core::data::{CachedSource, CsvCache, CsvFileProvider, LoadedSeries};
use stocklens_core::export::{snapshot_csv, snapshot_json};
use stocklens_core::signals::SignalDetector;
use stocklens_core::summary::{check_freshness, SeriesSummary};
use stocklens_core::{IndicatorConfig, IndicatorEngine};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stocklens", about = "StockLens: technical indicators over daily prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where prices come from and how they are cached.
#[derive(Args, Clone)]
struct DataArgs {
    /// Directory holding `{SYMBOL}.csv` price files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Cache directory.
    #[arg(long, default_value = ".stocklens_cache")]
    cache_dir: PathBuf,

    /// Cached files older than this are refetched.
    #[arg(long, default_value_t = 12)]
    max_age_hours: u64,

    /// Ignore fresh cache entries and refetch.
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Indicator config (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators for one or more symbols.
    Compute {
        /// Symbols to process (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        data: DataArgs,

        /// Snapshot format.
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Write `{SYMBOL}_indicators.{csv,json}` here instead of stdout.
        /// Required for more than one symbol.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print buy/sell signals and the trend bias for the latest bar.
    Signals {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Print growth, volatility and data freshness.
    Summary {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached symbols with date ranges and freshness.
    Status {
        #[arg(long, default_value = ".stocklens_cache")]
        cache_dir: PathBuf,

        #[arg(long, default_value_t = 12)]
        max_age_hours: u64,
    },
    /// Delete cached data for specific symbols.
    Remove {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(long, default_value = ".stocklens_cache")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            symbols,
            data,
            format,
            output_dir,
        } => run_compute(&symbols, &data, format, output_dir.as_deref()),
        Commands::Signals { symbols, data } => run_signals(&symbols, &data),
        Commands::Summary { symbols, data } => run_summary(&symbols, &data),
        Commands::Cache { action } => match action {
            CacheAction::Status {
                cache_dir,
                max_age_hours,
            } => run_cache_status(&cache_dir, max_age_hours),
            CacheAction::Remove { symbols, cache_dir } => run_cache_remove(&symbols, &cache_dir),
        },
    }
}

fn max_age(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

fn load_config(data: &DataArgs) -> Result<IndicatorConfig> {
    match &data.config {
        Some(path) => IndicatorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(IndicatorConfig::default()),
    }
}

fn build_source(data: &DataArgs) -> CachedSource {
    CachedSource::new(
        Box::new(CsvFileProvider::new(&data.data_dir)),
        Box::new(CsvCache::with_max_age(
            &data.cache_dir,
            max_age(data.max_age_hours),
        )),
    )
}

/// Snapshots on stdout must be one document; several go to files.
fn check_output_target(symbols: &[String], output_dir: Option<&Path>) -> Result<()> {
    if output_dir.is_none() && symbols.len() > 1 {
        bail!(
            "--output-dir is required when computing {} symbols",
            symbols.len()
        );
    }
    Ok(())
}

fn load(source: &CachedSource, symbol: &str, refresh: bool) -> Result<LoadedSeries> {
    source
        .load(symbol, refresh)
        .with_context(|| format!("loading {symbol}"))
}

/// Run `task` for every symbol in parallel. Failures are logged and counted;
/// outputs come back in input order.
fn for_each_symbol<T, F>(symbols: &[String], task: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    let results: Vec<Result<T>> = symbols.par_iter().map(|s| task(s.as_str())).collect();

    let mut outputs = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (symbol, result) in symbols.iter().zip(results) {
        match result {
            Ok(out) => outputs.push(out),
            Err(e) => {
                error!(symbol = symbol.as_str(), "{e:#}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} symbols failed", symbols.len());
    }
    Ok(outputs)
}

fn run_compute(
    symbols: &[String],
    data: &DataArgs,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    check_output_target(symbols, output_dir)?;
    let engine = IndicatorEngine::new(load_config(data)?)?;
    let source = build_source(data);

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output dir {}", dir.display()))?;
    }

    let snapshots = for_each_symbol(symbols, |symbol| {
        let loaded = load(&source, symbol, data.refresh)?;
        let indicators = engine.compute(&loaded.series);
        let body = match format {
            OutputFormat::Csv => snapshot_csv(&loaded.series, &indicators)?,
            OutputFormat::Json => snapshot_json(&loaded.series, &indicators, engine.config())?,
        };

        if let Some(dir) = output_dir {
            let path = dir.join(format!(
                "{}_indicators.{}",
                loaded.series.symbol(),
                format.extension()
            ));
            std::fs::write(&path, &body)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(symbol, path = %path.display(), source = ?loaded.source, "wrote snapshot");
            Ok(None)
        } else {
            Ok(Some(body))
        }
    })?;

    for body in snapshots.into_iter().flatten() {
        print!("{body}");
    }
    Ok(())
}

fn run_signals(symbols: &[String], data: &DataArgs) -> Result<()> {
    let engine = IndicatorEngine::new(load_config(data)?)?;
    let source = build_source(data);
    let detector = SignalDetector::default();

    let reports = for_each_symbol(symbols, |symbol| {
        let loaded = load(&source, symbol, data.refresh)?;
        let warmup = engine.config().warmup();
        if loaded.series.len() <= warmup {
            warn!(
                symbol,
                bars = loaded.series.len(),
                warmup,
                "series shorter than the longest lookback; some rules cannot fire"
            );
        }
        let indicators = engine.compute(&loaded.series);
        let signals = detector.analyze(&loaded.series, &indicators);
        let bias = detector.trend_bias(&loaded.series, &indicators, engine.config());

        let mut report = format!(
            "{} ({}): trend {bias}\n",
            loaded.series.symbol(),
            loaded.series.last().date
        );
        if signals.is_empty() {
            report.push_str("  no signals\n");
        }
        for signal in &signals {
            report.push_str(&format!("  {signal}\n"));
        }
        Ok(report)
    })?;

    for report in reports {
        print!("{report}");
    }
    Ok(())
}

fn run_summary(symbols: &[String], data: &DataArgs) -> Result<()> {
    let source = build_source(data);
    let today = chrono::Local::now().date_naive();

    let reports = for_each_symbol(symbols, |symbol| {
        let loaded = load(&source, symbol, data.refresh)?;
        let summary = SeriesSummary::from_series(&loaded.series);
        let freshness = check_freshness(&loaded.series, today);

        Ok(format!(
            "{symbol}\n  \
             Period:     {} to {} ({} bars)\n  \
             Close:      {:.2} -> {:.2}\n  \
             Growth:     {:.2}%\n  \
             Volatility: {:.4}\n  \
             Last bar:   {} days ago{}\n",
            summary.first_date,
            summary.last_date,
            summary.bar_count,
            summary.first_close,
            summary.last_close,
            summary.growth_pct,
            summary.volatility,
            freshness.days_behind,
            if freshness.is_fresh { "" } else { " (stale)" },
            symbol = summary.symbol,
        ))
    })?;

    for report in reports {
        print!("{report}");
    }
    Ok(())
}

fn run_cache_status(cache_dir: &Path, max_age_hours: u64) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = CsvCache::with_max_age(cache_dir, max_age(max_age_hours));
    let statuses = cache.status().context("reading cache")?;
    if statuses.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    println!("{:<8} {:<12} {:<12} {:>6}  STATE", "SYMBOL", "START", "END", "BARS");
    for s in &statuses {
        println!(
            "{:<8} {:<12} {:<12} {:>6}  {}",
            s.symbol,
            s.start_date.to_string(),
            s.end_date.to_string(),
            s.bar_count,
            if s.fresh { "fresh" } else { "stale" }
        );
    }
    println!("{} symbols cached in {}", statuses.len(), cache_dir.display());
    Ok(())
}

fn run_cache_remove(symbols: &[String], cache_dir: &Path) -> Result<()> {
    let cache = CsvCache::new(cache_dir);
    for symbol in symbols {
        let removed = cache
            .remove(symbol)
            .with_context(|| format!("removing {symbol}"))?;
        if removed {
            println!("Removed {} from {}", symbol.to_uppercase(), cache.cache_dir().display());
        } else {
            println!("{} is not cached", symbol.to_uppercase());
        }
    }
    Ok(())
}
