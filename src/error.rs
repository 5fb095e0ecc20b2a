// WHY: Construction-time failures are the only errors the engine can produce
// Everything after a detector exists is total over its input, so nothing else lives here

use thiserror::Error;

/// Errors raised while building a model artifact or a detector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid byte budget: min_num_bytes={min_num_bytes}, max_num_bytes={max_num_bytes} (need 0 < max <= 10000 and min <= max)")]
    InvalidByteBudget {
        min_num_bytes: usize,
        max_num_bytes: usize,
    },

    #[error("model label '{0}' is not a known language code")]
    UnknownLanguage(String),

    #[error("model label '{0}' appears more than once")]
    DuplicateLanguage(String),

    #[error("model label set is empty")]
    EmptyLabelSet,

    #[error("model label set must contain the undetermined label 'und'")]
    MissingUnknownLabel,

    #[error("model needs at least one hidden layer")]
    NoHiddenLayers,

    #[error("invalid feature space #{index}: {reason}")]
    InvalidFeatureSpace { index: usize, reason: String },

    #[error("{what} contains a non-finite value")]
    NonFiniteWeight { what: String },

    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
}

impl ConfigError {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, found: usize) -> Self {
        ConfigError::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}
