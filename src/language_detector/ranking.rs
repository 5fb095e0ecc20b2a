// WHY: Ordering is separate from scoring so top-N never recomputes anything

use std::cmp::Ordering;

use super::{LanguageScore, ResultSet};

fn by_evidence(a: &LanguageScore, b: &LanguageScore) -> Ordering {
    b.proportion
        .total_cmp(&a.proportion)
        .then_with(|| b.probability.total_cmp(&a.probability))
}

/// Sort by proportion, then probability, both descending; equal scores keep input order
pub fn rank(mut scores: Vec<LanguageScore>) -> ResultSet {
    scores.sort_by(by_evidence);
    ResultSet(scores)
}

/// First `n` results of an already ranked set
pub fn top_n(results: &ResultSet, n: usize) -> Vec<LanguageScore> {
    results.iter().take(n).cloned().collect()
}
