// Model artifact loading from disk and validation of malformed artifacts
// WHY: A bad model must fail construction loudly instead of producing silent garbage later

use langspan::{ConfigError, Language, LanguageDetector, ModelArtifact, ModelSpec};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{TestFixture, ENGLISH, TINY_MODEL_JSON};

fn fixture_spec() -> ModelSpec {
    serde_json::from_str(TINY_MODEL_JSON).unwrap()
}

#[test]
fn test_load_model_from_file() {
    let fixture = TestFixture::new();
    let path = fixture.write_model("model.json");

    let model = ModelArtifact::load(&path).unwrap();
    assert_eq!(model.labels().len(), 3);
    assert!(model.supports(Language::English));

    let detector = LanguageDetector::with_defaults(model).unwrap();
    assert_eq!(detector.config().min_num_bytes, 140);
    assert_eq!(detector.config().max_num_bytes, 700);
}

#[test]
fn test_loaded_and_parsed_models_agree() {
    let fixture = TestFixture::new();
    let path = fixture.write_model("nested/dir/model.json");

    let from_file = LanguageDetector::with_defaults(ModelArtifact::load(&path).unwrap()).unwrap();
    let from_str = LanguageDetector::with_defaults(std::sync::Arc::new(
        ModelArtifact::from_json_str(TINY_MODEL_JSON).unwrap(),
    ))
    .unwrap();
    let text = ENGLISH.repeat(3);
    assert_eq!(from_file.identify(&text), from_str.identify(&text));
}

#[test]
fn test_load_missing_file_fails_with_path() {
    let fixture = TestFixture::new();
    let missing = fixture.root_path.join("missing.json");
    let error = ModelArtifact::load(&missing).unwrap_err();
    assert!(format!("{error:#}").contains("missing.json"));
}

#[test]
fn test_load_malformed_json_fails() {
    let fixture = TestFixture::new();
    let path = fixture.create_document("broken.json", b"{\"labels\": [\"und\"");
    assert!(ModelArtifact::load(&path).is_err());
}

#[test]
fn test_load_inconsistent_model_reports_config_error() {
    let fixture = TestFixture::new();
    let mut spec = fixture_spec();
    spec.softmax.weights.cols = 2;
    spec.softmax.weights.weights.truncate(4);
    spec.softmax.bias.truncate(2);
    let path = fixture.create_document("bad.json", serde_json::to_string(&spec).unwrap().as_bytes());

    let error = ModelArtifact::load(&path).unwrap_err();
    let config_error = error.downcast_ref::<ConfigError>().expect("validation error is kept as the source");
    assert!(matches!(config_error, ConfigError::DimensionMismatch { .. }));
}

#[test]
fn test_hidden_layer_chain_is_checked() {
    let mut spec = fixture_spec();
    spec.hidden_layers[0].weights.rows = 4;
    spec.hidden_layers[0].weights.weights.truncate(8);
    assert!(matches!(
        ModelArtifact::from_spec(spec),
        Err(ConfigError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_default_hash_seed_applies_when_missing() {
    let mut value: serde_json::Value = serde_json::from_str(TINY_MODEL_JSON).unwrap();
    value.as_object_mut().unwrap().remove("hash_seed");
    let model = ModelArtifact::from_json_str(&value.to_string()).unwrap();
    assert_eq!(model.hash_seed(), langspan::hash::DEFAULT_HASH_SEED);
}

#[test]
fn test_misspelled_model_keys_are_rejected() {
    let mut value: serde_json::Value = serde_json::from_str(TINY_MODEL_JSON).unwrap();
    let root = value.as_object_mut().unwrap();
    let seed = root.remove("hash_seed").unwrap();
    root.insert("hash_sed".to_string(), seed);
    let error = ModelArtifact::from_json_str(&value.to_string()).unwrap_err();
    assert!(format!("{error:#}").contains("hash_sed"));

    let mut value: serde_json::Value = serde_json::from_str(TINY_MODEL_JSON).unwrap();
    value["softmax"]["weights"]["colums"] = serde_json::json!(3);
    assert!(ModelArtifact::from_json_str(&value.to_string()).is_err());

    let mut value: serde_json::Value = serde_json::from_str(TINY_MODEL_JSON).unwrap();
    value["feature_spaces"][1]["feature"]["id_dimension"] = serde_json::json!(10);
    assert!(ModelArtifact::from_json_str(&value.to_string()).is_err());
}

#[test]
fn test_overflowing_matrix_shape_is_a_config_error() {
    let mut spec = fixture_spec();
    spec.softmax.weights.rows = 1usize << 63;
    spec.softmax.weights.weights.clear();
    assert!(matches!(
        ModelArtifact::from_spec(spec),
        Err(ConfigError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_model_spec_round_trips_through_json() {
    let spec = fixture_spec();
    let json = serde_json::to_string(&spec).unwrap();
    let model = ModelArtifact::from_json_str(&json).unwrap();
    assert_eq!(model.concat_dim(), 5);
}
