use sagebridge::core::config::{
    AppConfig, DEFAULT_ENDPOINT_NAME, DEFAULT_MODEL_ID, DeployConfig, HubTokenSource,
    TrainingConfig,
};
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_app_config_defaults_endpoint_name() {
    let config = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.endpoint_name, DEFAULT_ENDPOINT_NAME);

    let config = AppConfig::from_lookup(lookup(&[("SAGEMAKER_ENDPOINT_NAME", "  ")])).unwrap();
    assert_eq!(config.endpoint_name, "llama3-endpoint");
}

#[test]
fn test_app_config_reads_endpoint_name() {
    let config =
        AppConfig::from_lookup(lookup(&[("SAGEMAKER_ENDPOINT_NAME", "my-endpoint")])).unwrap();
    assert_eq!(config.endpoint_name, "my-endpoint");
}

#[test]
fn test_deploy_config_defaults() {
    let config = DeployConfig::from_lookup(lookup(&[("HF_TOKEN", "hf_abc")])).unwrap();

    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert_eq!(config.num_gpus, 1);
    assert_eq!(config.hub_token, HubTokenSource::Inline("hf_abc".to_string()));
    assert_eq!(config.tgi_version, "3.0.1");
    assert_eq!(config.instance_type, "ml.g5.4xlarge");
    assert_eq!(config.instance_count, 1);
    assert_eq!(config.health_check_timeout_secs, 900);
    assert!(config.role_arn.is_none());
    assert!(config.image_uri.is_none());
}

#[test]
fn test_deploy_config_prefers_inline_token_over_parameter() {
    let config = DeployConfig::from_lookup(lookup(&[
        ("HF_TOKEN", "hf_abc"),
        ("HF_TOKEN_PARAM", "/llm/hf_token"),
    ]))
    .unwrap();
    assert_eq!(config.hub_token, HubTokenSource::Inline("hf_abc".to_string()));

    let config =
        DeployConfig::from_lookup(lookup(&[("HF_TOKEN_PARAM", "/llm/hf_token")])).unwrap();
    assert_eq!(
        config.hub_token,
        HubTokenSource::Parameter("/llm/hf_token".to_string())
    );
}

#[test]
fn test_deploy_config_requires_token() {
    let err = DeployConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(err.contains("HF_TOKEN"));
}

#[test]
fn test_deploy_config_rejects_bad_numbers() {
    let err = DeployConfig::from_lookup(lookup(&[("HF_TOKEN", "hf_abc"), ("SM_NUM_GPUS", "four")]))
        .unwrap_err();
    assert!(err.starts_with("SM_NUM_GPUS"));
}

#[test]
fn test_training_config_requires_s3_locations() {
    let err = TrainingConfig::from_lookup(lookup(&[("TRAIN_DATA_S3_URI", "s3://b/train/")]))
        .unwrap_err();
    assert!(err.starts_with("TRAIN_OUTPUT_S3_URI"));
}

#[test]
fn test_training_config_defaults() {
    let config = TrainingConfig::from_lookup(lookup(&[
        ("TRAIN_DATA_S3_URI", "s3://b/train/"),
        ("TRAIN_OUTPUT_S3_URI", "s3://b/out/"),
        ("TRAIN_SOURCE_S3_URI", "s3://b/src/sourcedir.tar.gz"),
    ]))
    .unwrap();

    assert_eq!(config.instance_type, "ml.g5.2xlarge");
    assert_eq!(config.instance_count, 1);
    assert_eq!(config.entry_point, "run_clm.py");
    assert_eq!(config.transformers_version, "4.36.0");
    assert_eq!(config.pytorch_version, "2.1.0");
    assert_eq!(config.py_version, "py310");
}
