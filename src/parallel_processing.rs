// WHY: Batch identification for the CLI and benchmarks
// Identification is CPU-bound, so each document runs on the blocking pool while reads stay async

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::language_detector::{LanguageDetector, LanguageScore};
use crate::reader::{AsyncFileReader, ReadStats, ReaderConfig};

/// Identification outcome for one input document
#[derive(Serialize, Debug, Clone)]
pub struct DocumentReport {
    /// File path, or "-" for standard input
    pub source: String,
    pub bytes_read: u64,
    /// Whether the reader stopped at its byte cap
    pub truncated: bool,
    pub languages: Vec<LanguageScore>,
    pub processing_time_ms: u64,
    /// Read error, if the document could not be read
    pub error: Option<String>,
}

/// Identify every text with at most `jobs` running at once; output order matches input order
pub async fn identify_batch(
    detector: &LanguageDetector,
    texts: Vec<Vec<u8>>,
    num_langs: usize,
    jobs: usize,
) -> Result<Vec<Vec<LanguageScore>>> {
    let jobs = jobs.max(1);
    debug!("Identifying {} texts with {} jobs", texts.len(), jobs);

    stream::iter(texts)
        .map(|text| {
            let detector = detector.clone();
            async move {
                tokio::task::spawn_blocking(move || detector.find_top_n_most_freq_langs(&text, num_langs))
                    .await
                    .context("Identification task failed")
            }
        })
        .buffered(jobs)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect()
}

/// Identify one already-read document
pub async fn identify_document(
    detector: &LanguageDetector,
    content: Vec<u8>,
    stats: ReadStats,
    num_langs: usize,
) -> Result<DocumentReport> {
    let start_time = Instant::now();

    let languages = if stats.read_error.is_some() {
        Vec::new()
    } else {
        let detector = detector.clone();
        tokio::task::spawn_blocking(move || detector.find_top_n_most_freq_langs(&content, num_langs))
            .await
            .with_context(|| format!("Identification task failed for {}", stats.file_path))?
    };

    Ok(DocumentReport {
        source: stats.file_path,
        bytes_read: stats.bytes_read,
        truncated: stats.truncated,
        languages,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
        error: stats.read_error,
    })
}

async fn process_file(
    reader: &AsyncFileReader,
    detector: &LanguageDetector,
    path: &Path,
    num_langs: usize,
) -> Result<DocumentReport> {
    let (content, stats) = reader.read_document(path).await?;
    if let Some(ref error) = stats.read_error {
        warn!("Skipping {}: {}", path.display(), error);
    }
    identify_document(detector, content, stats, num_langs).await
}

/// Read and identify files with at most `jobs` in flight
/// `on_report` sees each report in input order as soon as it and all earlier ones are done
pub async fn process_files_parallel<F>(
    detector: &LanguageDetector,
    paths: &[PathBuf],
    reader_config: ReaderConfig,
    num_langs: usize,
    jobs: usize,
    mut on_report: F,
) -> Result<Vec<DocumentReport>>
where
    F: FnMut(&DocumentReport),
{
    let jobs = jobs.max(1);
    info!("Processing {} files with {} jobs", paths.len(), jobs);

    let reader = Arc::new(AsyncFileReader::new(reader_config));
    let mut reports_stream = stream::iter(paths.iter().cloned())
        .map(|path| {
            let reader = Arc::clone(&reader);
            async move { process_file(&reader, detector, &path, num_langs).await }
        })
        .buffered(jobs);

    let mut reports = Vec::with_capacity(paths.len());
    while let Some(report) = reports_stream.next().await {
        // only fail_fast reads or panicked tasks surface here
        let report = report?;
        on_report(&report);
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!("Processed {} files, {} failed", reports.len(), failed);
    Ok(reports)
}
