//! distgen: generate distribution data from the command line.
//!
//! Resolves a family, draws a flat or matrix sample, evaluates the chosen
//! statistics and prints a table preview with the summary stats (or the
//! whole result as JSON).

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use distboard_compute::{Assembler, GenerationResult};
use distboard_core::config::load_dotenv;
use distboard_core::{Config, DistributionSpec, Family, GenerationRequest, Parameters, SampleShape};

// ── CLI ─────────────────────────────────────────────────────────────

/// Generate samples, density/cumulative values and user statistics for a distribution.
#[derive(Parser, Debug)]
#[command(name = "distgen", version, about)]
struct Cli {
    /// Family id or label (norm, expon, uniform, poisson, binom, geom).
    #[arg(short, long, default_value = "norm")]
    distribution: String,

    /// Named parameter, repeatable: --param mean=0 --param sd=1.
    #[arg(long = "param", value_parser = parse_named, conflicts_with = "positional")]
    params: Vec<(String, f64)>,

    /// Positional parameters in schema order: --positional 10,0.5.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    positional: Option<Vec<f64>>,

    /// Number of variates.
    #[arg(short = 'n', long, default_value_t = 100, conflicts_with = "matrix")]
    size: usize,

    /// Draw a ROWSxCOLS grid instead of a flat sample.
    #[arg(long, value_parser = parse_matrix)]
    matrix: Option<(usize, usize)>,

    /// Statistic evaluated over the variates.
    #[arg(long, default_value = "Survival Function")]
    primary: String,

    /// Statistic evaluated over the cumulative values.
    #[arg(long)]
    secondary: Option<String>,

    #[arg(long, env = "RANDOM_SEED")]
    seed: Option<u64>,

    /// Table rows to preview.
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_named(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn parse_matrix(raw: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected ROWSxCOLS, got '{raw}'"))?;
    let rows = rows.trim().parse().map_err(|e| format!("invalid row count: {e}"))?;
    let cols = cols.trim().parse().map_err(|e| format!("invalid column count: {e}"))?;
    Ok((rows, cols))
}

fn print_preview(result: &GenerationResult, rows: usize) {
    let preview = result.table.head(rows).rounded(4);
    let names = preview.column_names();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(10);

    let header: Vec<String> = names.iter().map(|n| format!("{n:>width$}")).collect();
    println!("{}", header.join("  "));
    for index in 0..preview.row_count() {
        if let Some(row) = preview.row(index) {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>width$}")).collect();
            println!("{}", cells.join("  "));
        }
    }
    if result.table.row_count() > rows {
        println!("... {} more rows", result.table.row_count() - rows);
    }

    println!();
    for (key, value) in &result.stats {
        println!("{key:>10}  {value}");
    }
}

fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let family: Family = cli.distribution.parse()?;
    let parameters = match (cli.positional, cli.params.is_empty()) {
        (Some(values), _) => Parameters::positional(values),
        (None, false) => Parameters::named(cli.params),
        (None, true) => config.defaults.parameters_for(family),
    };
    let shape = match cli.matrix {
        Some((rows, cols)) => SampleShape::Matrix { rows, cols },
        None => SampleShape::Flat(cli.size),
    };

    let mut request = GenerationRequest::new(DistributionSpec::for_family(family, parameters), shape, cli.primary);
    if let Some(secondary) = cli.secondary {
        request = request.with_secondary(secondary);
    }
    if let Some(seed) = cli.seed.or(config.generation.default_seed) {
        request = request.with_seed(seed);
    }

    info!(family = %family, samples = shape.total(), "generating");
    let result = Assembler::from_config(&config)
        .generate(&request)
        .with_context(|| format!("generation failed for {}", family.label()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_preview(&result, cli.rows);
    }

    Ok(())
}
