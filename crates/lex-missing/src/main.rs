//! CLI entry point for missing-value analysis.

use anyhow::{Result, anyhow};
use chrono::Local;
use clap::{Parser, ValueEnum};
use lex_missing::{LegendPosition, MissingError, MissingPlotter, MissingRequest, RenderConfig};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};

/// Exit status for failures caused by the command line rather than the data.
const USAGE_EXIT: u8 = 2;

/// CLI-compatible legend position enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<CliLegendPosition> for LegendPosition {
    fn from(cli: CliLegendPosition) -> Self {
        match cli {
            CliLegendPosition::Top => LegendPosition::Top,
            CliLegendPosition::Bottom => LegendPosition::Bottom,
            CliLegendPosition::Left => LegendPosition::Left,
            CliLegendPosition::Right => LegendPosition::Right,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Missing-value analysis for tabular data",
    long_about = "Locate missing values in a CSV file and describe how they affect other columns.\n\
                  The rendered chart specification is printed to stdout as JSON.\n\n\
                  EXAMPLES:\n  \
                  # Whole-table missing spectrum, first 200 rows\n  \
                  lex-missing -i data.csv --num-rows 200\n\n  \
                  # Impact of one column's missing values on the others\n  \
                  lex-missing -i data.csv -x HDI_for_year\n\n  \
                  # Impact on a single other column, with the intermediate summary\n  \
                  lex-missing -i data.csv -x HDI_for_year -y population --intermediate"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// Column whose missing values define the partition
    #[arg(short = 'x', long)]
    x: Option<String>,

    /// Single column to characterize against x (requires x)
    #[arg(short = 'y', long)]
    y: Option<String>,

    /// Maximum rows shown in the spectrum heatmap
    #[arg(long)]
    num_rows: Option<usize>,

    /// Maximum columns shown in the spectrum heatmap
    #[arg(long)]
    num_cols: Option<usize>,

    /// Histogram bin count for impact views
    #[arg(long)]
    bins: Option<usize>,

    /// Extra cell values to read as missing (repeatable)
    #[arg(long = "null-value")]
    null_values: Vec<String>,

    /// Figure height in pixels
    #[arg(long, default_value = "375")]
    height: u32,

    /// Figure width in pixels
    #[arg(long, default_value = "325")]
    width: u32,

    /// Opacity of filled series (0.0 - 1.0)
    #[arg(long, default_value = "0.3")]
    alpha: f64,

    /// Legend placement
    #[arg(long, value_enum, default_value = "top")]
    legend: CliLegendPosition,

    /// Also print a summary of the intermediate result
    #[arg(long)]
    intermediate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only the JSON output.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            let body = err
                .downcast_ref::<MissingError>()
                .and_then(|missing| serde_json::to_string(missing).ok());
            if let Some(body) = body {
                eprintln!("{body}");
            }
            ExitCode::from(exit_status(&err))
        }
    }
}

/// `2` for argument errors (bad columns, flags or config), `1` otherwise.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<MissingError>() {
        Some(missing) if missing.is_argument_error() => USAGE_EXIT,
        _ => 1,
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    info!("Loading dataset from: {}", args.input.display());
    let data = load_csv(&args.input, &args.null_values)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let config = RenderConfig::builder()
        .height(args.height)
        .width(args.width)
        .alpha(args.alpha)
        .legend_position(args.legend.into())
        .build()
        .map_err(MissingError::from)?;

    let mut request = MissingRequest::from_args(
        args.x.as_deref(),
        args.y.as_deref(),
        args.num_rows,
        args.num_cols,
    )?;
    if let Some(bins) = args.bins {
        request = request.with_num_bins(bins)?;
    }
    debug!("Request: {:?}", request);

    let plotter = MissingPlotter::builder().render_config(config).build()?;
    let (figure, intermediate) = plotter
        .plot(&data, &request, args.intermediate)?
        .into_parts();

    let mut output = json!({
        "generated_at": Local::now().to_rfc3339(),
        "input_file": args.input.display().to_string(),
        "figure": figure,
    });
    if let Some(intermediate) = intermediate {
        output["intermediate"] = serde_json::to_value(intermediate.summary())?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_csv(path: &Path, null_values: &[String]) -> Result<DataFrame> {
    let mut parse_options = CsvParseOptions::default().with_quote_char(Some(b'"'));
    if !null_values.is_empty() {
        let markers = null_values.iter().map(|v| v.as_str().into()).collect();
        parse_options = parse_options.with_null_values(Some(NullValues::AllColumns(markers)));
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}
