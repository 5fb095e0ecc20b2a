pub mod error;
pub mod hash;
pub mod language;
pub mod language_detector;
pub mod model;
pub mod parallel_processing;
pub mod reader;
pub mod script;

// Re-export main types for convenient access
pub use error::ConfigError;
pub use language::Language;
pub use language_detector::{
    DetectorConfig, LanguageDetector, LanguageScore, ResultSet, MAX_NUM_INPUT_BYTES,
    RELIABILITY_HR_BS_THRESHOLD, RELIABILITY_MARGIN_THRESHOLD, RELIABILITY_THRESHOLD,
};
pub use model::{ModelArtifact, ModelSpec};
pub use script::Script;

// Re-export batch processing for the CLI and benchmarks
pub use parallel_processing::{identify_batch, process_files_parallel, DocumentReport};
pub use reader::{AsyncFileReader, ReadStats, ReaderConfig};
