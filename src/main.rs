use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use langspan::parallel_processing::{identify_document, process_files_parallel, DocumentReport};
use langspan::reader::{AsyncFileReader, ReaderConfig};
use langspan::{DetectorConfig, LanguageDetector, ModelArtifact};

#[derive(Parser, Debug)]
#[command(name = "langspan")]
#[command(about = "Identify the languages in short, possibly mixed-language text")]
#[command(version)]
struct Args {
    /// Input files or glob patterns; reads stdin when none are given
    inputs: Vec<String>,

    /// Model artifact (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Minimum cleaned bytes a span needs to be scored
    #[arg(long, default_value_t = 140)]
    min_bytes: usize,

    /// Bytes of each input examined at most
    #[arg(long, default_value_t = 700)]
    max_bytes: usize,

    /// Number of languages reported per input
    #[arg(long, default_value_t = 3)]
    top: usize,

    /// Abort on first unreadable input
    #[arg(long)]
    fail_fast: bool,

    /// Concurrent identifications (default: number of CPUs)
    #[arg(long)]
    jobs: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// Expand glob patterns; plain paths that match nothing are kept so the reader reports them
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        paths.push(path);
                        matched = true;
                    }
                }
                Err(e) => warn!("Unreadable glob match for {}: {}", pattern, e),
            }
        }
        if !matched {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}

fn print_report(out: &mut impl Write, report: &DocumentReport) -> Result<()> {
    serde_json::to_writer(&mut *out, report).context("Failed to serialize report")?;
    writeln!(out).context("Failed to write report")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: stdout carries one JSON result per line, so logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let config = DetectorConfig::new(args.min_bytes, args.max_bytes)?;
    let model = ModelArtifact::load(&args.model)?;
    let detector = LanguageDetector::new(model, config)?;

    let reader_config = ReaderConfig {
        fail_fast: args.fail_fast,
        max_bytes: args.max_bytes as u64,
        ..ReaderConfig::default()
    };
    let stdout = std::io::stdout();

    if args.inputs.is_empty() {
        let reader = AsyncFileReader::new(reader_config);
        let (content, stats) = reader.read_stdin().await.context("Failed to read stdin")?;
        let report = identify_document(&detector, content, stats, args.top).await?;
        print_report(&mut stdout.lock(), &report)?;
        return Ok(());
    }

    let paths = expand_inputs(&args.inputs)?;
    let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        bar
    };

    let mut write_error = None;
    let reports = {
        let mut out = stdout.lock();
        process_files_parallel(&detector, &paths, reader_config, args.top, jobs, |report| {
            progress.inc(1);
            if write_error.is_none() {
                if let Err(e) = print_report(&mut out, report) {
                    write_error = Some(e);
                }
            }
        })
        .await?
    };
    if let Some(e) = write_error {
        return Err(e);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    progress.finish_with_message(format!("{} inputs, {} failed", reports.len(), failed));
    info!("Identified {} inputs, {} failed", reports.len(), failed);
    Ok(())
}
