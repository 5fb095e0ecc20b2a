// WHY: Per-span votes become document-level scores weighted by span byte length
// Reliability is decided here, once per language, after all spans are in

use std::ops::Range;

use crate::language::Language;

use super::{
    LanguageScore, RELIABILITY_HR_BS_THRESHOLD, RELIABILITY_MARGIN_THRESHOLD, RELIABILITY_THRESHOLD,
};

/// Outcome of scoring one span
#[derive(Debug, Clone, PartialEq)]
pub struct SpanVote {
    /// Range of the span in the normalized text
    pub byte_range: Range<usize>,
    /// Evidence weight, the span's byte length before cleaning
    pub evidence_bytes: usize,
    /// Highest-scoring label for the span
    pub language: Language,
    pub probability: f32,
    /// Top probability minus the runner-up
    pub margin: f32,
}

#[derive(Debug)]
struct LanguageStats {
    language: Language,
    byte_sum: usize,
    prob_sum: f64,
    margin_sum: f64,
    ranges: Vec<Range<usize>>,
}

impl LanguageStats {
    fn new(language: Language) -> Self {
        Self {
            language,
            byte_sum: 0,
            prob_sum: 0.0,
            margin_sum: 0.0,
            ranges: Vec::new(),
        }
    }

    fn add(&mut self, vote: &SpanVote) {
        let weight = vote.evidence_bytes as f64;
        self.byte_sum += vote.evidence_bytes;
        self.prob_sum += f64::from(vote.probability) * weight;
        self.margin_sum += f64::from(vote.margin) * weight;
        match self.ranges.last_mut() {
            Some(last) if last.end == vote.byte_range.start => last.end = vote.byte_range.end,
            _ => self.ranges.push(vote.byte_range.clone()),
        }
    }
}

/// Confidence cutoff for one language; Croatian and Bosnian are too close to separate at 0.7
pub fn reliability_threshold(language: Language) -> f32 {
    match language {
        Language::Croatian | Language::Bosnian => RELIABILITY_HR_BS_THRESHOLD,
        _ => RELIABILITY_THRESHOLD,
    }
}

/// Reliable only with enough evidence, enough confidence and enough separation from the runner-up
pub fn is_reliable(language: Language, probability: f32, margin: f32, enough_evidence: bool) -> bool {
    !language.is_unknown()
        && enough_evidence
        && probability >= reliability_threshold(language)
        && margin >= RELIABILITY_MARGIN_THRESHOLD
}

/// Combine span votes into unranked scores, one per language in first-vote order
/// With no evidence at all the result is the single undetermined score
pub fn aggregate(votes: &[SpanVote], min_num_bytes: usize) -> Vec<LanguageScore> {
    let mut stats: Vec<LanguageStats> = Vec::new();
    for vote in votes.iter().filter(|v| v.evidence_bytes > 0) {
        match stats.iter_mut().find(|s| s.language == vote.language) {
            Some(entry) => entry.add(vote),
            None => {
                let mut entry = LanguageStats::new(vote.language);
                entry.add(vote);
                stats.push(entry);
            }
        }
    }

    let total: usize = stats.iter().map(|s| s.byte_sum).sum();
    if total == 0 {
        return vec![LanguageScore::undetermined()];
    }

    let enough_evidence = total >= min_num_bytes;
    stats
        .into_iter()
        .map(|entry| {
            let byte_sum = entry.byte_sum as f64;
            let probability = (entry.prob_sum / byte_sum) as f32;
            let margin = (entry.margin_sum / byte_sum) as f32;
            LanguageScore {
                language: entry.language,
                probability,
                proportion: (byte_sum / total as f64) as f32,
                is_reliable: is_reliable(entry.language, probability, margin, enough_evidence),
                ranges: entry.ranges,
            }
        })
        .collect()
}
