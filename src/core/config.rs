use std::env;

pub const DEFAULT_ENDPOINT_NAME: &str = "llama3-endpoint";
pub const DEFAULT_MODEL_ID: &str = "meta-llama/Llama-3.1-8B-Instruct";
pub const TOKEN_PLACEHOLDER: &str = "<REPLACE WITH YOUR TOKEN>";

/// Where the Hugging Face hub token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubTokenSource {
    /// Token given directly in the environment.
    Inline(String),
    /// Name of an SSM `SecureString` parameter holding the token.
    Parameter(String),
}

/// Configuration for the API Lambda.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            endpoint_name: non_empty(&lookup, "SAGEMAKER_ENDPOINT_NAME")
                .unwrap_or_else(|| DEFAULT_ENDPOINT_NAME.to_string()),
        })
    }
}

/// Configuration for deploying the model behind a SageMaker endpoint.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub endpoint_name: String,
    pub model_id: String,
    pub num_gpus: u32,
    pub hub_token: HubTokenSource,
    pub tgi_version: String,
    pub instance_type: String,
    pub instance_count: i32,
    pub health_check_timeout_secs: i32,
    pub role_arn: Option<String>,
    pub image_uri: Option<String>,
    pub region: Option<String>,
}

impl DeployConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hub_token = match (
            non_empty(&lookup, "HF_TOKEN"),
            non_empty(&lookup, "HF_TOKEN_PARAM"),
        ) {
            (Some(token), _) => HubTokenSource::Inline(token),
            (None, Some(param)) => HubTokenSource::Parameter(param),
            (None, None) => {
                return Err("HF_TOKEN or HF_TOKEN_PARAM must be set".to_string());
            }
        };

        Ok(Self {
            endpoint_name: non_empty(&lookup, "SAGEMAKER_ENDPOINT_NAME")
                .unwrap_or_else(|| DEFAULT_ENDPOINT_NAME.to_string()),
            model_id: non_empty(&lookup, "HF_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            num_gpus: parsed(&lookup, "SM_NUM_GPUS", 1)?,
            hub_token,
            tgi_version: non_empty(&lookup, "TGI_VERSION").unwrap_or_else(|| "3.0.1".to_string()),
            instance_type: non_empty(&lookup, "DEPLOY_INSTANCE_TYPE")
                .unwrap_or_else(|| "ml.g5.4xlarge".to_string()),
            instance_count: parsed(&lookup, "DEPLOY_INSTANCE_COUNT", 1)?,
            health_check_timeout_secs: parsed(&lookup, "HEALTH_CHECK_TIMEOUT_SECS", 900)?,
            role_arn: non_empty(&lookup, "SAGEMAKER_ROLE_ARN"),
            image_uri: non_empty(&lookup, "IMAGE_URI"),
            region: non_empty(&lookup, "AWS_REGION"),
        })
    }
}

/// Configuration for launching the fine-tuning job.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub model_id: String,
    pub instance_type: String,
    pub instance_count: i32,
    pub train_data_uri: String,
    pub output_uri: String,
    pub source_uri: String,
    pub entry_point: String,
    pub transformers_version: String,
    pub pytorch_version: String,
    pub py_version: String,
    pub role_arn: Option<String>,
    pub image_uri: Option<String>,
    pub region: Option<String>,
}

impl TrainingConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            model_id: non_empty(&lookup, "HF_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            instance_type: non_empty(&lookup, "TRAIN_INSTANCE_TYPE")
                .unwrap_or_else(|| "ml.g5.2xlarge".to_string()),
            instance_count: parsed(&lookup, "TRAIN_INSTANCE_COUNT", 1)?,
            train_data_uri: required(&lookup, "TRAIN_DATA_S3_URI")?,
            output_uri: required(&lookup, "TRAIN_OUTPUT_S3_URI")?,
            source_uri: required(&lookup, "TRAIN_SOURCE_S3_URI")?,
            entry_point: non_empty(&lookup, "TRAIN_ENTRY_POINT")
                .unwrap_or_else(|| "run_clm.py".to_string()),
            transformers_version: non_empty(&lookup, "TRANSFORMERS_VERSION")
                .unwrap_or_else(|| "4.36.0".to_string()),
            pytorch_version: non_empty(&lookup, "PYTORCH_VERSION")
                .unwrap_or_else(|| "2.1.0".to_string()),
            py_version: non_empty(&lookup, "PY_VERSION").unwrap_or_else(|| "py310".to_string()),
            role_arn: non_empty(&lookup, "SAGEMAKER_ROLE_ARN"),
            image_uri: non_empty(&lookup, "IMAGE_URI"),
            region: non_empty(&lookup, "AWS_REGION"),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or_else(|| format!("{}: environment variable not found", key))
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{}: {}", key, e)),
        None => Ok(default),
    }
}
