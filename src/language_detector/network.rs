// WHY: Small feed-forward scorer: concat embeddings -> hidden layers -> softmax over labels
// Pure function of the model and the feature vector, so spans can be scored from any thread

use crate::model::{DenseLayer, ModelArtifact};

use super::features::FeatureVector;

/// Probability distribution over the model's label set, in label order
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probabilities: Vec<f32>,
}

impl Distribution {
    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    /// Index and probability of the most likely label; the first index wins ties
    pub fn best(&self) -> (usize, f32) {
        let mut best = (0, f32::NEG_INFINITY);
        for (index, &p) in self.probabilities.iter().enumerate() {
            if p > best.1 {
                best = (index, p);
            }
        }
        best
    }

    /// Gap between the top two probabilities; 1.0 if there is only one label
    pub fn margin(&self) -> f32 {
        let mut first = f32::NEG_INFINITY;
        let mut second = f32::NEG_INFINITY;
        for &p in &self.probabilities {
            if p > first {
                second = first;
                first = p;
            } else if p > second {
                second = p;
            }
        }
        if second == f32::NEG_INFINITY {
            return first.max(0.0);
        }
        first - second
    }
}

/// Run the network over one feature vector
pub fn score(model: &ModelArtifact, features: &FeatureVector) -> Distribution {
    let mut activations = features.as_slice().to_vec();
    // the concatenated embeddings enter the first layer without ReLU
    let mut relu_input = false;
    for layer in model.hidden_layers() {
        activations = forward(layer, &activations, relu_input);
        relu_input = true;
    }
    let logits = forward(model.softmax(), &activations, true);
    Distribution {
        probabilities: softmax(&logits),
    }
}

/// `bias + sum_i f(x_i) * W[i]`, with `f` = ReLU when `relu_input` is set
fn forward(layer: &DenseLayer, input: &[f32], relu_input: bool) -> Vec<f32> {
    let mut output = layer.bias.clone();
    for (index, &x) in input.iter().enumerate().take(layer.input_dim()) {
        let x = if relu_input { x.max(0.0) } else { x };
        if x == 0.0 {
            continue;
        }
        for (out, w) in output.iter_mut().zip(layer.weights.row(index)) {
            *out += x * w;
        }
    }
    output
}

/// Numerically stable softmax; falls back to uniform if the logits are not finite
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if !max.is_finite() || !sum.is_finite() || sum <= 0.0 {
        let uniform = 1.0 / logits.len() as f32;
        return vec![uniform; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}
