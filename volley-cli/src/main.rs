use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use volley::core::{
    Credentials, ScenarioTemplate, DEFAULT_CONCURRENCY, DEFAULT_REQUESTS, DEFAULT_WARMUP,
};
use volley::report::write_reports;
use volley::{BenchConfig, Benchmark};

mod presets;

const DEFAULT_BASE_URL: &str = "http://localhost:5154";
const DEFAULT_OUT_DIR: &str = "artifacts/perf";

/// Benchmark an HTTP API through a sequence of scenarios.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Target base URL.
    #[arg(long, env = "VOLLEY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Measured requests per scenario.
    #[arg(short, long, default_value_t = DEFAULT_REQUESTS)]
    requests: usize,

    /// Maximum requests in flight per scenario.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: NonZeroUsize,

    /// Discarded requests issued before each measured batch.
    #[arg(short, long, default_value_t = DEFAULT_WARMUP)]
    warmup: usize,

    /// Per-request timeout, e.g. `60s` or `1m 30s`.
    #[arg(long, default_value = "60s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Directory for the JSON and CSV reports.
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// JSON file with an array of scenario templates. Defaults to the clinic preset.
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// `email:password` pair to authenticate with. Repeat to try several in order.
    #[arg(long = "login", env = "VOLLEY_LOGIN", required = true)]
    logins: Vec<Credentials>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("volley=info")),
        )
        .init();

    let cli = Cli::parse();
    let templates = match &cli.scenarios {
        Some(path) => load_templates(path)?,
        None => presets::clinic_today(),
    };

    let config = BenchConfig {
        base_url: cli.base_url,
        settings: volley::core::RunSettings {
            request_count: cli.requests,
            concurrency: cli.concurrency,
            warmup_count: cli.warmup,
        },
        credentials: cli.logins,
        request_timeout: cli.timeout,
    };

    let results = Benchmark::new(config)?.run(&templates).await?;

    println!("\n=== SUMMARY ===");
    for result in &results {
        println!("{}", result.summary_line());
    }

    let paths = write_reports(&cli.out_dir, &results).context("Failed to write reports")?;
    println!("\n[OK] JSON: {}", paths.json.display());
    println!("[OK] CSV : {}", paths.csv.display());

    Ok(())
}

fn load_templates(path: &Path) -> Result<Vec<ScenarioTemplate>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid scenario file {}", path.display()))
}
