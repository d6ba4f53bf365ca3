//! Hugging Face deep learning container image URIs.

use crate::errors::GatewayError;

const DEFAULT_REGISTRY_ACCOUNT: &str = "763104351884";
const TGI_REPOSITORY: &str = "huggingface-pytorch-tgi-inference";
const TRAINING_REPOSITORY: &str = "huggingface-pytorch-training";

/// Regions whose DLC registry lives outside the default account.
const REGION_ACCOUNTS: &[(&str, &str)] = &[
    ("af-south-1", "626614931356"),
    ("ap-east-1", "871362719292"),
    ("eu-south-1", "692866216735"),
    ("me-south-1", "217643126080"),
    ("cn-north-1", "727897471807"),
    ("cn-northwest-1", "727897471807"),
];

/// TGI release -> container tag.
const TGI_TAGS: &[(&str, &str)] = &[("3.0.1", "2.4.0-tgi3.0.1-gpu-py311-cu124-ubuntu22.04")];

/// PyTorch release -> (cuda, os) suffix of the training container tag.
const TRAINING_PLATFORMS: &[(&str, &str, &str)] = &[
    ("2.0.0", "cu118", "ubuntu20.04"),
    ("2.1.0", "cu121", "ubuntu20.04"),
];

fn registry_host(region: &str) -> String {
    let account = REGION_ACCOUNTS
        .iter()
        .find(|(r, _)| *r == region)
        .map_or(DEFAULT_REGISTRY_ACCOUNT, |(_, a)| *a);
    let domain = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("{account}.dkr.ecr.{region}.{domain}")
}

/// Image URI of the text-generation-inference container for `version`.
pub fn tgi_image_uri(region: &str, version: &str) -> Result<String, GatewayError> {
    let tag = TGI_TAGS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, tag)| *tag)
        .ok_or_else(|| {
            GatewayError::ConfigError(format!(
                "unknown TGI version {version}; set IMAGE_URI explicitly"
            ))
        })?;
    Ok(format!("{}/{TGI_REPOSITORY}:{tag}", registry_host(region)))
}

/// Image URI of the Hugging Face PyTorch training container.
pub fn training_image_uri(
    region: &str,
    pytorch_version: &str,
    transformers_version: &str,
    py_version: &str,
) -> Result<String, GatewayError> {
    let (_, cuda, os) = TRAINING_PLATFORMS
        .iter()
        .find(|(pt, _, _)| *pt == pytorch_version)
        .ok_or_else(|| {
            GatewayError::ConfigError(format!(
                "unknown PyTorch version {pytorch_version}; set IMAGE_URI explicitly"
            ))
        })?;
    Ok(format!(
        "{}/{TRAINING_REPOSITORY}:{pytorch_version}-transformers{transformers_version}-gpu-{py_version}-{cuda}-{os}",
        registry_host(region)
    ))
}
