// WHY: Public face of the engine; one call runs normalize -> segment -> score -> aggregate -> rank
// The detector holds only its byte budget and a shared immutable model, so it is Send + Sync and cheap to clone

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::language::Language;
use crate::model::ModelArtifact;

pub mod aggregation;
pub mod features;
pub mod network;
pub mod normalization;
pub mod ranking;
pub mod segmenter;
pub mod squeeze;

pub use aggregation::SpanVote;
pub use features::{FeatureExtractor, FeatureVector, SparseFeature};
pub use network::Distribution;
pub use normalization::{clean_span_text, clean_span_text_into, normalize};
pub use segmenter::{segment, Span};

/// Minimum probability for a reliable result
pub const RELIABILITY_THRESHOLD: f32 = 0.7;

/// Minimum probability for a reliable Croatian or Bosnian result
pub const RELIABILITY_HR_BS_THRESHOLD: f32 = 0.5;

/// Minimum average gap between a language and its runner-up for a reliable result
pub const RELIABILITY_MARGIN_THRESHOLD: f32 = 0.1;

/// Largest `max_num_bytes` a detector accepts
pub const MAX_NUM_INPUT_BYTES: usize = 10_000;

/// Byte budget bound to a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    /// Spans shorter than this, before or after cleaning, are not scored
    pub min_num_bytes: usize,
    /// Input beyond this many bytes is ignored; at most `MAX_NUM_INPUT_BYTES`
    pub max_num_bytes: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_num_bytes: 140,
            max_num_bytes: 700,
        }
    }
}

impl DetectorConfig {
    pub fn new(min_num_bytes: usize, max_num_bytes: usize) -> Result<Self, ConfigError> {
        let config = Self {
            min_num_bytes,
            max_num_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Deserialized configs bypass `new`, so the detector validates again
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_num_bytes == 0
            || self.max_num_bytes > MAX_NUM_INPUT_BYTES
            || self.min_num_bytes > self.max_num_bytes
        {
            return Err(ConfigError::InvalidByteBudget {
                min_num_bytes: self.min_num_bytes,
                max_num_bytes: self.max_num_bytes,
            });
        }
        Ok(())
    }
}

/// One identified language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageScore {
    pub language: Language,
    /// Byte-weighted model confidence over the spans that voted for this language
    pub probability: f32,
    /// Share of all evidence bytes attributed to this language
    pub proportion: f32,
    pub is_reliable: bool,
    /// Byte ranges of the normalized input attributed to this language, in input order
    pub ranges: Vec<Range<usize>>,
}

impl LanguageScore {
    /// Terminal result for input with no usable evidence
    pub fn undetermined() -> Self {
        Self {
            language: Language::Unknown,
            probability: 0.0,
            proportion: 0.0,
            is_reliable: false,
            ranges: Vec::new(),
        }
    }
}

/// Ranked results of one call: proportion desc, probability desc, then input order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<LanguageScore>);

impl ResultSet {
    pub fn iter(&self) -> std::slice::Iter<'_, LanguageScore> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&LanguageScore> {
        self.0.first()
    }

    pub fn top_n(&self, n: usize) -> Vec<LanguageScore> {
        ranking::top_n(self, n)
    }

    pub fn into_vec(self) -> Vec<LanguageScore> {
        self.0
    }
}

impl IntoIterator for ResultSet {
    type Item = LanguageScore;
    type IntoIter = std::vec::IntoIter<LanguageScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a LanguageScore;
    type IntoIter = std::slice::Iter<'a, LanguageScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Language identifier over a shared model
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    config: DetectorConfig,
    model: Arc<ModelArtifact>,
}

impl LanguageDetector {
    pub fn new(model: Arc<ModelArtifact>, config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "Created language detector: min_num_bytes={}, max_num_bytes={}, {} labels",
            config.min_num_bytes,
            config.max_num_bytes,
            model.labels().len()
        );
        Ok(Self { config, model })
    }

    /// Detector with the default 140/700 byte budget
    pub fn with_defaults(model: Arc<ModelArtifact>) -> Result<Self, ConfigError> {
        Self::new(model, DetectorConfig::default())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<ModelArtifact> {
        &self.model
    }

    /// Full ranked result set; never empty, never fails
    pub fn identify(&self, text: impl AsRef<[u8]>) -> ResultSet {
        let normalized = normalize(text.as_ref(), self.config.max_num_bytes);
        let spans = segment(&normalized);
        let votes = self.score_spans(&spans);
        debug!(
            "Scored {} of {} spans over {} bytes",
            votes.len(),
            spans.len(),
            normalized.len()
        );
        if votes.is_empty() {
            debug!("No span had enough evidence; result is undetermined");
        }
        ranking::rank(aggregation::aggregate(&votes, self.config.min_num_bytes))
    }

    /// Most likely language of the whole text
    pub fn find_language(&self, text: impl AsRef<[u8]>) -> LanguageScore {
        self.identify(text)
            .into_iter()
            .next()
            .unwrap_or_else(LanguageScore::undetermined)
    }

    /// Up to `num_langs` languages, most evidence first
    pub fn find_top_n_most_freq_langs(&self, text: impl AsRef<[u8]>, num_langs: usize) -> Vec<LanguageScore> {
        self.identify(text).top_n(num_langs)
    }

    /// Like `find_top_n_most_freq_langs`, restricted to `codes`
    /// Codes the model cannot emit are ignored; proportions still refer to the whole text
    pub fn find_top_n_filtered<S: AsRef<str>>(
        &self,
        text: impl AsRef<[u8]>,
        num_langs: usize,
        codes: &[S],
    ) -> Vec<LanguageScore> {
        let mut wanted = Vec::with_capacity(codes.len());
        for code in codes {
            let code = code.as_ref();
            match Language::from_code(code) {
                Some(language) if self.model.supports(language) => wanted.push(language),
                _ => debug!("Ignoring unsupported language code '{}'", code),
            }
        }
        if wanted.is_empty() || num_langs == 0 {
            return Vec::new();
        }
        self.identify(text)
            .into_iter()
            .filter(|score| wanted.contains(&score.language))
            .take(num_langs)
            .collect()
    }

    fn score_spans(&self, spans: &[Span<'_>]) -> Vec<SpanVote> {
        let extractor = FeatureExtractor::new(&self.model);
        let mut cleaned = String::new();
        let mut votes = Vec::with_capacity(spans.len());
        for span in spans.iter().filter(|s| s.has_letters()) {
            clean_span_text_into(span.text, &mut cleaned);
            let squeezed = squeeze::cheap_squeeze(&cleaned);
            // cleaning pads and lowercasing can grow text, so the raw span is gated too
            if squeezed.is_empty() || span.len().min(squeezed.len()) < self.config.min_num_bytes {
                continue;
            }
            let distribution = network::score(&self.model, &extractor.extract(&squeezed));
            let (index, probability) = distribution.best();
            votes.push(SpanVote {
                byte_range: span.byte_range.clone(),
                evidence_bytes: span.len(),
                language: self.model.labels()[index],
                probability,
                margin: distribution.margin(),
            });
        }
        votes
    }
}
