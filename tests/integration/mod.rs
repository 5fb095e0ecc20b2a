// Integration test utilities and common code
// WHY: Centralized fixtures avoid duplication across integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

use langspan::{DetectorConfig, LanguageDetector, ModelArtifact};

pub const TINY_MODEL_JSON: &str = include_str!("../fixtures/tiny_model.json");

pub const ENGLISH: &str = "This text is written in English.";
pub const BULGARIAN: &str = "Този текст е на Български.";
pub const BILINGUAL: &str = "This piece of text is in English. Този текст е на Български.";

/// Shared fixture model, parsed once per test binary
pub fn tiny_model() -> Arc<ModelArtifact> {
    static MODEL: OnceLock<Arc<ModelArtifact>> = OnceLock::new();
    Arc::clone(MODEL.get_or_init(|| {
        Arc::new(ModelArtifact::from_json_str(TINY_MODEL_JSON).expect("fixture model must be valid"))
    }))
}

pub fn detector(min_num_bytes: usize, max_num_bytes: usize) -> LanguageDetector {
    let config = DetectorConfig::new(min_num_bytes, max_num_bytes).expect("valid byte budget");
    LanguageDetector::new(tiny_model(), config).expect("detector construction")
}

/// Deterministic byte noise for adversarial inputs
pub fn noise_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// Temporary directory holding input documents and model files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        Self { temp_dir, root_path }
    }

    /// Write an input document with arbitrary bytes
    pub fn create_document<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Copy of the fixture model on disk
    pub fn write_model(&self, name: &str) -> PathBuf {
        self.create_document(name, TINY_MODEL_JSON.as_bytes())
    }
}
