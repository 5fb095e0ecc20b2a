// WHY: Input documents arrive as raw bytes; decoding is the detector's job, not the reader's
// Reads stop at a byte cap because the engine never looks past its input budget anyway

use anyhow::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::language_detector::MAX_NUM_INPUT_BYTES;

/// Configuration for document reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
    /// Bytes read per document at most
    pub max_bytes: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
            max_bytes: MAX_NUM_INPUT_BYTES as u64,
        }
    }
}

/// Statistics for one document read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    /// Whether the document was longer than `max_bytes`
    pub truncated: bool,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

impl ReadStats {
    fn failed(file_path: String, duration_ms: u64, error: String) -> Self {
        Self {
            file_path,
            bytes_read: 0,
            truncated: false,
            duration_ms,
            read_error: Some(error),
        }
    }
}

/// Async reader producing capped raw byte buffers
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read up to `max_bytes` of a document
    /// Without fail_fast, errors come back as empty content with `read_error` set
    pub async fn read_document<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<u8>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of document: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open file {}: {}", path.display(), e);
                warn!("{}", error_msg);
                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                let stats = ReadStats::failed(
                    path.display().to_string(),
                    start_time.elapsed().as_millis() as u64,
                    error_msg,
                );
                return Ok((Vec::new(), stats));
            }
        };

        match self.read_capped(BufReader::with_capacity(self.config.buffer_size, file)).await {
            Ok((content, truncated)) => {
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    bytes_read: content.len() as u64,
                    truncated,
                    duration_ms: start_time.elapsed().as_millis() as u64,
                    read_error: None,
                };
                debug!(
                    "Read {}: {} bytes in {}ms{}",
                    path.display(),
                    stats.bytes_read,
                    stats.duration_ms,
                    if truncated { " (truncated)" } else { "" }
                );
                Ok((content, stats))
            }
            Err(e) => {
                let error_msg = format!("Failed to read file {}: {}", path.display(), e);
                warn!("{}", error_msg);
                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                let stats = ReadStats::failed(
                    path.display().to_string(),
                    start_time.elapsed().as_millis() as u64,
                    error_msg,
                );
                Ok((Vec::new(), stats))
            }
        }
    }

    /// Read standard input under the same cap
    pub async fn read_stdin(&self) -> Result<(Vec<u8>, ReadStats)> {
        let start_time = std::time::Instant::now();
        let (content, truncated) = self.read_capped(tokio::io::stdin()).await?;
        let stats = ReadStats {
            file_path: "-".to_string(),
            bytes_read: content.len() as u64,
            truncated,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };
        Ok((content, stats))
    }

    /// Read several documents one after another, in input order
    pub async fn read_documents_batch<P: AsRef<Path>>(&self, file_paths: &[P]) -> Result<Vec<(Vec<u8>, ReadStats)>> {
        info!("Starting batch read of {} documents", file_paths.len());

        let mut results = Vec::with_capacity(file_paths.len());
        for file_path in file_paths {
            // read_document only errors under fail_fast
            results.push(self.read_document(file_path).await?);
        }

        let failed = results.iter().filter(|(_, stats)| stats.read_error.is_some()).count();
        info!("Completed batch read of {} documents, {} failed", results.len(), failed);
        Ok(results)
    }

    async fn read_capped<R: AsyncRead + Unpin>(&self, reader: R) -> std::io::Result<(Vec<u8>, bool)> {
        // one extra byte tells a document of exactly max_bytes from a longer one
        let mut limited = reader.take(self.config.max_bytes.saturating_add(1));
        let mut content = Vec::new();
        limited.read_to_end(&mut content).await?;
        let truncated = content.len() as u64 > self.config.max_bytes;
        if truncated {
            content.truncate(self.config.max_bytes as usize);
        }
        Ok((content, truncated))
    }
}

/// Read one document with the default configuration
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<Vec<u8>> {
    let reader = AsyncFileReader::new(ReaderConfig {
        fail_fast: true,
        ..ReaderConfig::default()
    });
    let (content, _stats) = reader.read_document(file_path).await?;
    Ok(content)
}
