// WHY: The one long-lived piece of state, built once and shared read-only through Arc
// ModelSpec is the serde interchange shape; ModelArtifact is the validated, immutable form

use anyhow::{Context, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::hash::DEFAULT_HASH_SEED;
use crate::language::Language;
use crate::script::Script;

/// Row-major weight matrix as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixSpec {
    pub rows: usize,
    pub cols: usize,
    pub weights: Vec<f32>,
}

/// Dense layer: `rows` = input size, `cols` = output size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub weights: MatrixSpec,
    pub bias: Vec<f32>,
}

/// Which sparse feature a feature space computes from the span text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FeatureKind {
    /// Bag of character n-grams hashed into `id_dim` buckets
    CharNgrams {
        size: usize,
        id_dim: usize,
        #[serde(default)]
        include_terminators: bool,
        #[serde(default)]
        include_spaces: bool,
        #[serde(default)]
        use_equal_weight: bool,
    },
    /// Dominant script of the text, one feature with weight 1
    Script,
    /// Share of letters per script
    RelevantScripts,
}

impl FeatureKind {
    /// Number of distinct feature ids, which must equal the embedding row count
    pub fn domain_size(&self) -> usize {
        match self {
            FeatureKind::CharNgrams { id_dim, .. } => *id_dim,
            FeatureKind::Script | FeatureKind::RelevantScripts => Script::COUNT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpaceSpec {
    pub feature: FeatureKind,
    pub embedding: MatrixSpec,
}

/// Serialized model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub labels: Vec<String>,
    #[serde(default = "default_hash_seed")]
    pub hash_seed: u32,
    pub feature_spaces: Vec<FeatureSpaceSpec>,
    pub hidden_layers: Vec<LayerSpec>,
    pub softmax: LayerSpec,
}

fn default_hash_seed() -> u32 {
    DEFAULT_HASH_SEED
}

/// Validated row-major matrix
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    fn from_spec(spec: MatrixSpec, what: &str) -> Result<Self, ConfigError> {
        let expected = spec
            .rows
            .checked_mul(spec.cols)
            .ok_or_else(|| ConfigError::mismatch(format!("{what} shape"), usize::MAX, spec.weights.len()))?;
        if spec.weights.len() != expected {
            return Err(ConfigError::mismatch(format!("{what} weights"), expected, spec.weights.len()));
        }
        if spec.cols == 0 {
            return Err(ConfigError::mismatch(format!("{what} columns"), 1, 0));
        }
        if spec.weights.iter().any(|w| !w.is_finite()) {
            return Err(ConfigError::NonFiniteWeight {
                what: format!("{what} weights"),
            });
        }
        Ok(Self {
            rows: spec.rows,
            cols: spec.cols,
            data: spec.weights,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `index`; callers guarantee `index < rows`
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }
}

#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn from_spec(spec: LayerSpec, what: &str) -> Result<Self, ConfigError> {
        let weights = Matrix::from_spec(spec.weights, what)?;
        if spec.bias.len() != weights.cols() {
            return Err(ConfigError::mismatch(format!("{what} bias"), weights.cols(), spec.bias.len()));
        }
        if spec.bias.iter().any(|b| !b.is_finite()) {
            return Err(ConfigError::NonFiniteWeight {
                what: format!("{what} bias"),
            });
        }
        Ok(Self {
            weights,
            bias: spec.bias,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.weights.rows()
    }

    pub fn output_dim(&self) -> usize {
        self.weights.cols()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureSpace {
    pub kind: FeatureKind,
    pub embedding: Matrix,
    /// Offset of this space inside the concatenated feature vector
    pub offset: usize,
}

impl FeatureSpace {
    pub fn dim(&self) -> usize {
        self.embedding.cols()
    }
}

/// Immutable, validated model: label set, embeddings, network weights, hash parameters
#[derive(Debug)]
pub struct ModelArtifact {
    labels: Vec<Language>,
    hash_seed: u32,
    feature_spaces: Vec<FeatureSpace>,
    concat_dim: usize,
    hidden_layers: Vec<DenseLayer>,
    softmax: DenseLayer,
}

impl ModelArtifact {
    /// Validate every dimension and resolve label codes
    pub fn from_spec(spec: ModelSpec) -> Result<Self, ConfigError> {
        let labels = resolve_labels(&spec.labels)?;

        let mut feature_spaces = Vec::with_capacity(spec.feature_spaces.len());
        let mut offset = 0;
        for (index, space) in spec.feature_spaces.into_iter().enumerate() {
            validate_feature_kind(index, &space.feature)?;
            let embedding = Matrix::from_spec(space.embedding, &format!("feature space #{index} embedding"))?;
            let domain = space.feature.domain_size();
            if embedding.rows() != domain {
                return Err(ConfigError::mismatch(
                    format!("feature space #{index} embedding rows"),
                    domain,
                    embedding.rows(),
                ));
            }
            let dim = embedding.cols();
            feature_spaces.push(FeatureSpace {
                kind: space.feature,
                embedding,
                offset,
            });
            offset += dim;
        }
        if feature_spaces.is_empty() {
            return Err(ConfigError::InvalidFeatureSpace {
                index: 0,
                reason: "model defines no feature spaces".to_string(),
            });
        }
        let concat_dim = offset;

        if spec.hidden_layers.is_empty() {
            return Err(ConfigError::NoHiddenLayers);
        }
        let mut hidden_layers = Vec::with_capacity(spec.hidden_layers.len());
        let mut input_dim = concat_dim;
        for (index, layer) in spec.hidden_layers.into_iter().enumerate() {
            let what = format!("hidden layer #{index}");
            let layer = DenseLayer::from_spec(layer, &what)?;
            if layer.input_dim() != input_dim {
                return Err(ConfigError::mismatch(format!("{what} input"), input_dim, layer.input_dim()));
            }
            input_dim = layer.output_dim();
            hidden_layers.push(layer);
        }

        let softmax = DenseLayer::from_spec(spec.softmax, "softmax layer")?;
        if softmax.input_dim() != input_dim {
            return Err(ConfigError::mismatch("softmax layer input", input_dim, softmax.input_dim()));
        }
        if softmax.output_dim() != labels.len() {
            return Err(ConfigError::mismatch("softmax layer output", labels.len(), softmax.output_dim()));
        }

        debug!(
            "Validated model: {} labels, {} feature spaces, concat dim {}, {} hidden layers",
            labels.len(),
            feature_spaces.len(),
            concat_dim,
            hidden_layers.len()
        );

        Ok(Self {
            labels,
            hash_seed: spec.hash_seed,
            feature_spaces,
            concat_dim,
            hidden_layers,
            softmax,
        })
    }

    /// Parse and validate a JSON model
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: ModelSpec = serde_json::from_str(json).context("Failed to parse model JSON")?;
        Ok(Self::from_spec(spec)?)
    }

    /// Load a JSON model file, memory-mapped to avoid a second copy of large weight tables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let path = path.as_ref();
        info!("Loading model artifact from {}", path.display());

        let file = File::open(path).with_context(|| format!("Failed to open model file {}", path.display()))?;
        // SAFETY: the mapping is read-only and dropped before this function returns;
        // concurrent truncation of the file by another process is outside our contract
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map model file {}", path.display()))?;
        let spec: ModelSpec = serde_json::from_slice(&mmap)
            .with_context(|| format!("Failed to parse model file {}", path.display()))?;
        let model = Self::from_spec(spec).with_context(|| format!("Invalid model file {}", path.display()))?;

        info!(
            "Loaded model with {} labels and {} feature spaces",
            model.labels.len(),
            model.feature_spaces.len()
        );
        Ok(Arc::new(model))
    }

    pub fn labels(&self) -> &[Language] {
        &self.labels
    }

    pub fn supports(&self, language: Language) -> bool {
        self.labels.contains(&language)
    }

    pub fn hash_seed(&self) -> u32 {
        self.hash_seed
    }

    pub fn feature_spaces(&self) -> &[FeatureSpace] {
        &self.feature_spaces
    }

    /// Length of the concatenated embedding vector
    pub fn concat_dim(&self) -> usize {
        self.concat_dim
    }

    pub fn hidden_layers(&self) -> &[DenseLayer] {
        &self.hidden_layers
    }

    pub fn softmax(&self) -> &DenseLayer {
        &self.softmax
    }
}

fn resolve_labels(codes: &[String]) -> Result<Vec<Language>, ConfigError> {
    if codes.is_empty() {
        return Err(ConfigError::EmptyLabelSet);
    }
    let mut seen = HashSet::with_capacity(codes.len());
    let mut labels = Vec::with_capacity(codes.len());
    for code in codes {
        let language = Language::from_code(code).ok_or_else(|| ConfigError::UnknownLanguage(code.clone()))?;
        if !seen.insert(language) {
            return Err(ConfigError::DuplicateLanguage(code.clone()));
        }
        labels.push(language);
    }
    if !seen.contains(&Language::Unknown) {
        return Err(ConfigError::MissingUnknownLabel);
    }
    Ok(labels)
}

fn validate_feature_kind(index: usize, kind: &FeatureKind) -> Result<(), ConfigError> {
    if let FeatureKind::CharNgrams { size, id_dim, .. } = kind {
        if *size == 0 {
            return Err(ConfigError::InvalidFeatureSpace {
                index,
                reason: "n-gram size must be positive".to_string(),
            });
        }
        if *id_dim == 0 {
            return Err(ConfigError::InvalidFeatureSpace {
                index,
                reason: "n-gram id_dim must be positive".to_string(),
            });
        }
    }
    Ok(())
}
