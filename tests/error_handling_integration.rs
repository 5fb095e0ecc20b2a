// Construction errors versus inputs that must never fail
// WHY: Configuration mistakes surface immediately; bad input degrades to "und" instead of erroring

use langspan::{ConfigError, DetectorConfig, Language, LanguageDetector, LanguageScore, MAX_NUM_INPUT_BYTES};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{detector, noise_bytes, tiny_model, BULGARIAN, ENGLISH};

#[test]
fn test_invalid_byte_budgets_are_rejected() {
    for (min, max) in [(0, 0), (10, 5), (701, 700)] {
        assert_eq!(
            DetectorConfig::new(min, max).unwrap_err(),
            ConfigError::InvalidByteBudget {
                min_num_bytes: min,
                max_num_bytes: max
            }
        );
    }
}

#[test]
fn test_unvalidated_config_is_rejected_at_construction() {
    let config = DetectorConfig {
        min_num_bytes: 100,
        max_num_bytes: 50,
    };
    let error = LanguageDetector::new(tiny_model(), config).unwrap_err();
    assert!(error.to_string().contains("min_num_bytes=100"));
}

#[test]
fn test_budget_beyond_hard_cap_fails_construction() {
    let error = DetectorConfig::new(0, MAX_NUM_INPUT_BYTES + 1).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidByteBudget { .. }));

    let config: DetectorConfig = serde_json::from_str(r#"{"min_num_bytes": 0, "max_num_bytes": 50000}"#).unwrap();
    assert!(LanguageDetector::new(tiny_model(), config).is_err());
}

#[test]
fn test_misspelled_config_key_is_rejected() {
    let parsed = serde_json::from_str::<DetectorConfig>(r#"{"min_num_bytes": 0, "max_num_bytes": 10, "max_bytes_typo": 5}"#);
    assert!(parsed.unwrap_err().to_string().contains("max_bytes_typo"));
}

#[test]
fn test_input_just_below_min_bytes_is_undetermined() {
    let text = "Hi there";
    for min in [text.len() + 1, text.len() + 2] {
        assert_eq!(detector(min, 1000).find_language(text), LanguageScore::undetermined(), "min={min}");
    }
    assert_eq!(detector(text.len(), 1000).find_language(text).language, Language::English);
}

#[test]
fn test_malformed_encoding_is_substituted() {
    let d = detector(0, 1000);
    let mut input = ENGLISH.as_bytes().to_vec();
    input.insert(4, 0xFF);
    input.push(0xC3);
    let result = d.find_language(&input);
    assert_eq!(result.language, Language::English);
}

#[test]
fn test_non_text_input_is_undetermined() {
    let d = detector(0, 1000);
    for input in [&b"\x00\x01\x02\x03"[..], b"1234567890", b"!!! ??? ...", b"\xFF\xFF\xFF"] {
        assert_eq!(d.find_language(input), LanguageScore::undetermined(), "{input:?}");
    }
}

#[test]
fn test_oversized_input_is_capped() {
    let d = detector(0, MAX_NUM_INPUT_BYTES);
    let mut input: Vec<u8> = noise_bytes(3, 50_000)
        .into_iter()
        .map(|b| if b % 5 == 0 { b' ' } else { b'a' + b % 26 })
        .collect();
    input.extend_from_slice(BULGARIAN.as_bytes());

    // the Bulgarian tail is past the hard cap and never examined
    let results = d.identify(&input);
    assert_eq!(results, d.identify(&input[..MAX_NUM_INPUT_BYTES]));
    assert!(results.iter().all(|r| r.language != Language::Bulgarian));
    assert!(results
        .iter()
        .flat_map(|r| &r.ranges)
        .all(|range| range.end <= MAX_NUM_INPUT_BYTES));
}

#[test]
fn test_unsupported_filter_codes_are_ignored() {
    let d = detector(0, 1000);
    assert!(d.find_top_n_filtered(ENGLISH, 3, &["xx-Bogus", "fr"]).is_empty());
    let results = d.find_top_n_filtered(ENGLISH, 3, &["xx-Bogus", "en"]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].language, Language::English);
}

#[test]
fn test_zero_results_requested() {
    let d = detector(0, 1000);
    assert!(d.find_top_n_most_freq_langs(ENGLISH, 0).is_empty());
}
