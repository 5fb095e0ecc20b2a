// WHY: Turns cleaned span text into the fixed-length vector the network consumes
// Sparse features per feature space, then a weighted sum of embedding rows per space

use std::collections::BTreeMap;

use crate::hash::murmur2;
use crate::model::{FeatureKind, FeatureSpace, ModelArtifact};
use crate::script::{classify, CharClass, Script};

/// One sparse feature: embedding row id and its weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseFeature {
    pub id: usize,
    pub weight: f32,
}

/// Concatenated embedding vector for one span, `ModelArtifact::concat_dim` long
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parameters of a character n-gram feature space
#[derive(Debug, Clone, Copy)]
pub struct NgramParams {
    pub size: usize,
    pub id_dim: usize,
    pub include_terminators: bool,
    pub include_spaces: bool,
    pub use_equal_weight: bool,
    pub seed: u32,
}

/// Hashed bag of character n-grams
/// With terminators, every space-delimited token is wrapped in '^' and '$'
/// Weights are relative counts, or 1/unique when `use_equal_weight` is set
pub fn char_ngram_features(text: &str, params: &NgramParams) -> Vec<SparseFeature> {
    let raw_chars: Vec<&str> = text
        .char_indices()
        .map(|(index, ch)| &text[index..index + ch.len_utf8()])
        .collect();

    let chars = if params.include_terminators {
        let mut wrapped = Vec::with_capacity(raw_chars.len() * 2 + 2);
        wrapped.push("^");
        for ch in raw_chars {
            if ch == " " {
                wrapped.extend_from_slice(&["$", " ", "^"]);
            } else {
                wrapped.push(ch);
            }
        }
        wrapped.push("$");
        wrapped
    } else {
        raw_chars
    };

    // BTreeMap keeps summation order stable across calls
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut count_sum = 0u32;
    if params.size > 0 && chars.len() >= params.size {
        for window in chars.windows(params.size) {
            if !params.include_spaces && window.contains(&" ") {
                continue;
            }
            *counts.entry(window.concat()).or_insert(0) += 1;
            count_sum += 1;
        }
    }

    if counts.is_empty() {
        return Vec::new();
    }

    let equal_weight = 1.0 / counts.len() as f32;
    let norm = count_sum as f32;
    counts
        .into_iter()
        .map(|(ngram, count)| SparseFeature {
            id: murmur2(ngram.as_bytes(), params.seed) as usize % params.id_dim,
            weight: if params.use_equal_weight {
                equal_weight
            } else {
                count as f32 / norm
            },
        })
        .collect()
}

fn letter_counts_by_script(text: &str) -> [u32; Script::COUNT] {
    let mut counts = [0u32; Script::COUNT];
    for ch in text.chars() {
        if let CharClass::Letter(script) = classify(ch) {
            counts[script.id()] += 1;
        }
    }
    counts
}

/// Most frequent letter script (lowest id wins ties), `Common` when there are no letters
pub fn dominant_script(text: &str) -> Script {
    let counts = letter_counts_by_script(text);
    let mut best = Script::Common;
    let mut best_count = 0;
    for &script in SCRIPTS_BY_ID {
        let count = counts[script.id()];
        if count > best_count {
            best = script;
            best_count = count;
        }
    }
    best
}

/// Single feature naming the dominant script
pub fn script_features(text: &str) -> Vec<SparseFeature> {
    vec![SparseFeature {
        id: dominant_script(text).id(),
        weight: 1.0,
    }]
}

/// Share of letters per script, ordered by script id
pub fn relevant_script_features(text: &str) -> Vec<SparseFeature> {
    let counts = letter_counts_by_script(text);
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(id, &count)| SparseFeature {
            id,
            weight: count as f32 / total as f32,
        })
        .collect()
}

const SCRIPTS_BY_ID: &[Script] = &[
    Script::Common,
    Script::Inherited,
    Script::Latin,
    Script::Greek,
    Script::Cyrillic,
    Script::Armenian,
    Script::Hebrew,
    Script::Arabic,
    Script::Devanagari,
    Script::Bengali,
    Script::Gurmukhi,
    Script::Gujarati,
    Script::Oriya,
    Script::Tamil,
    Script::Telugu,
    Script::Kannada,
    Script::Malayalam,
    Script::Sinhala,
    Script::Thai,
    Script::Lao,
    Script::Tibetan,
    Script::Myanmar,
    Script::Georgian,
    Script::Hangul,
    Script::Ethiopic,
    Script::Khmer,
    Script::Mongolian,
    Script::Han,
    Script::Other,
];

/// Computes feature vectors against one model; cheap to build per call
pub struct FeatureExtractor<'m> {
    model: &'m ModelArtifact,
}

impl<'m> FeatureExtractor<'m> {
    pub fn new(model: &'m ModelArtifact) -> Self {
        Self { model }
    }

    /// Sparse features of one feature space
    pub fn sparse_features(&self, space: &FeatureSpace, text: &str) -> Vec<SparseFeature> {
        match space.kind {
            FeatureKind::CharNgrams {
                size,
                id_dim,
                include_terminators,
                include_spaces,
                use_equal_weight,
            } => char_ngram_features(
                text,
                &NgramParams {
                    size,
                    id_dim,
                    include_terminators,
                    include_spaces,
                    use_equal_weight,
                    seed: self.model.hash_seed(),
                },
            ),
            FeatureKind::Script => script_features(text),
            FeatureKind::RelevantScripts => relevant_script_features(text),
        }
    }

    /// Embed every feature space and concatenate; identical text yields an identical vector
    pub fn extract(&self, text: &str) -> FeatureVector {
        let mut concat = vec![0.0f32; self.model.concat_dim()];
        for space in self.model.feature_spaces() {
            let slot = &mut concat[space.offset..space.offset + space.dim()];
            for feature in self.sparse_features(space, text) {
                // ids are bounded by the domain size the model validated against
                if feature.id >= space.embedding.rows() {
                    continue;
                }
                for (value, weight) in slot.iter_mut().zip(space.embedding.row(feature.id)) {
                    *value += weight * feature.weight;
                }
            }
        }
        FeatureVector(concat)
    }
}
