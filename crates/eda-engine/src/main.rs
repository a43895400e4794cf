//! CLI entry point for the exploratory data analysis engine.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eda_engine::{AnalysisConfig, AnalysisResult, Pipeline, render_summary};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Exploratory data analysis with preprocessing suggestions",
    long_about = "Profiles a CSV file, flags data-quality problems and suggests \
                  preprocessing steps.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable report\n  \
                  eda-engine -i data.csv\n\n  \
                  # Stricter missing-value threshold\n  \
                  eda-engine -i data.csv --nullity-threshold 0.1\n\n  \
                  # JSON for other tools\n  \
                  eda-engine -i data.csv --json | jq '.recommendations[0]'"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with an analysis configuration
    ///
    /// Missing fields take their defaults. Threshold flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Null ratio above which a column is flagged (0.0 - 1.0)
    #[arg(long)]
    nullity_threshold: Option<f64>,

    /// Unique/row ratio above which a text column is flagged (0.0 - 1.0)
    #[arg(long)]
    cardinality_threshold: Option<f64>,

    /// IQR multiplier for outlier fences
    #[arg(long)]
    iqr_multiplier: Option<f64>,

    /// Absolute skewness above which a transform is suggested
    #[arg(long)]
    skewness_threshold: Option<f64>,

    /// Largest category count still suggested for one-hot encoding
    #[arg(long)]
    one_hot_max_categories: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the result (or error) is printed.
    #[arg(long)]
    json: bool,

    /// Also write the JSON result to this file
    #[arg(short = 'r', long)]
    emit_report: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input.display());
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    let result = match pipeline.analyze(&data) {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": e }));
            }
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    if let Some(path) = &args.emit_report {
        write_report(&result, path)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
    } else {
        print!("{}", render_summary(&result));
    }

    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let base = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config {}", path.display()))?;
            serde_json::from_str::<AnalysisConfig>(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    let config = AnalysisConfig::builder()
        .nullity_threshold(args.nullity_threshold.unwrap_or(base.nullity_threshold))
        .cardinality_threshold(args.cardinality_threshold.unwrap_or(base.cardinality_threshold))
        .iqr_multiplier(args.iqr_multiplier.unwrap_or(base.iqr_multiplier))
        .skewness_threshold(args.skewness_threshold.unwrap_or(base.skewness_threshold))
        .datetime_threshold(base.datetime_threshold)
        .text_uniqueness_threshold(base.text_uniqueness_threshold)
        .top_categories(base.top_categories)
        .one_hot_max_categories(
            args.one_hot_max_categories
                .unwrap_or(base.one_hot_max_categories),
        )
        .histogram_bins(base.histogram_bins)
        .build()?;

    Ok(config)
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Could not parse CSV {}", path.display()))?;
    Ok(df)
}

fn write_report(result: &AnalysisResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)
        .with_context(|| format!("Could not write report {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
