//! Launches the causal-LM fine-tuning job on SageMaker Training and waits
//! for it to finish.
//!
//! Hyperparameters are passed to the training container as JSON-encoded
//! strings, the same encoding the Hugging Face estimator uses, so the
//! container's `run_clm.py` entry point receives typed values.

use aws_sdk_sagemaker::Client as SageMakerClient;
use aws_sdk_sagemaker::types::{
    AlgorithmSpecification, Channel, DataSource, OutputDataConfig, ResourceConfig,
    S3DataDistribution, S3DataSource, S3DataType, StoppingCondition, TrainingInputMode,
    TrainingInstanceType, TrainingJobStatus,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::info;

use crate::core::config::TrainingConfig;
use crate::errors::GatewayError;

pub const JOB_NAME_PREFIX: &str = "huggingface-pytorch-training";
const TRAIN_CHANNEL: &str = "train";
const VOLUME_SIZE_GB: i32 = 30;
const MAX_RUNTIME_SECS: i32 = 24 * 60 * 60;
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(60);
// Covers instance provisioning and model upload on top of the runtime cap.
const WAIT_BUDGET_SECS: u64 = 24 * 60 * 60 + 2 * 60 * 60;

/// Arguments for the language-modeling example script.
pub fn default_hyperparameters(model_id: &str) -> Vec<(&'static str, Value)> {
    vec![
        ("do_train", json!(true)),
        ("do_eval", json!(false)),
        ("learning_rate", json!(2e-5)),
        ("model_name_or_path", json!(model_id)),
        ("train_file", json!("/opt/ml/input/data/train/train.txt")),
        ("evaluation_strategy", json!("epoch")),
        ("save_strategy", json!("epoch")),
        ("fp16", json!(true)),
        ("num_train_epochs", json!(2)),
        ("per_device_train_batch_size", json!(1)),
        ("per_device_eval_batch_size", json!(1)),
        ("overwrite_output_dir", json!(true)),
        ("output_dir", json!("/opt/ml/model")),
        ("logging_dir", json!("/opt/ml/output/logs")),
        ("tokenizer_name", json!(model_id)),
        ("block_size", json!(512)),
    ]
}

/// Encodes hyperparameters plus the framework's own `sagemaker_*` keys.
pub fn encode_hyperparameters(
    hyperparameters: &[(&str, Value)],
    config: &TrainingConfig,
    region: &str,
    job_name: &str,
) -> HashMap<String, String> {
    let framework = [
        ("sagemaker_program", json!(config.entry_point)),
        ("sagemaker_submit_directory", json!(config.source_uri)),
        ("sagemaker_region", json!(region)),
        ("sagemaker_job_name", json!(job_name)),
        ("sagemaker_container_log_level", json!(20)),
    ];

    hyperparameters
        .iter()
        .chain(framework.iter())
        .map(|(key, value)| ((*key).to_string(), value.to_string()))
        .collect()
}

#[derive(Debug)]
pub enum TrainingWait {
    Pending(String),
    Fatal(GatewayError),
}

/// Maps a training job status to done / keep waiting / give up.
pub fn classify_training_status(
    status: Option<&TrainingJobStatus>,
    failure_reason: Option<&str>,
) -> Result<(), TrainingWait> {
    match status {
        Some(TrainingJobStatus::Completed) => Ok(()),
        Some(s @ (TrainingJobStatus::Failed | TrainingJobStatus::Stopped)) => {
            Err(TrainingWait::Fatal(GatewayError::AwsError(format!(
                "training job {}: {}",
                s.as_str(),
                failure_reason.unwrap_or("no failure reason given")
            ))))
        }
        Some(s) => Err(TrainingWait::Pending(s.as_str().to_string())),
        None => Err(TrainingWait::Pending("Unknown".to_string())),
    }
}

pub fn training_job_name(now: DateTime<Utc>) -> String {
    format!("{JOB_NAME_PREFIX}-{}", now.format("%Y-%m-%d-%H-%M-%S-%3f"))
}

/// Submits the job and blocks until it completes.
///
/// # Errors
///
/// Returns an error if a request shape is incomplete, a SageMaker call fails,
/// or the job ends `Failed`/`Stopped`.
pub async fn launch_training_job(
    sagemaker: &SageMakerClient,
    config: &TrainingConfig,
    role_arn: &str,
    image_uri: &str,
    region: &str,
) -> Result<String, GatewayError> {
    let job_name = training_job_name(Utc::now());
    let hyperparameters = encode_hyperparameters(
        &default_hyperparameters(&config.model_id),
        config,
        region,
        &job_name,
    );

    let algorithm = AlgorithmSpecification::builder()
        .training_image(image_uri)
        .training_input_mode(TrainingInputMode::File)
        .build();

    let train_channel = Channel::builder()
        .channel_name(TRAIN_CHANNEL)
        .data_source(
            DataSource::builder()
                .s3_data_source(
                    S3DataSource::builder()
                        .s3_data_type(S3DataType::S3Prefix)
                        .s3_uri(&config.train_data_uri)
                        .s3_data_distribution_type(S3DataDistribution::FullyReplicated)
                        .build(),
                )
                .build(),
        )
        .build();

    let output = OutputDataConfig::builder()
        .s3_output_path(&config.output_uri)
        .build();

    let resources = ResourceConfig::builder()
        .instance_type(TrainingInstanceType::from(config.instance_type.as_str()))
        .instance_count(config.instance_count)
        .volume_size_in_gb(VOLUME_SIZE_GB)
        .build();

    info!(
        job_name = %job_name,
        image_uri = %image_uri,
        instance_type = %config.instance_type,
        train_data = %config.train_data_uri,
        "Creating training job"
    );

    let created = sagemaker
        .create_training_job()
        .training_job_name(&job_name)
        .role_arn(role_arn)
        .algorithm_specification(algorithm)
        .set_hyper_parameters(Some(hyperparameters))
        .input_data_config(train_channel)
        .output_data_config(output)
        .resource_config(resources)
        .stopping_condition(
            StoppingCondition::builder()
                .max_runtime_in_seconds(MAX_RUNTIME_SECS)
                .build(),
        )
        .send()
        .await?;

    info!("Training job created: {:?}", created);

    wait_for_training_job(sagemaker, &job_name).await?;

    Ok(job_name)
}

async fn wait_for_training_job(
    sagemaker: &SageMakerClient,
    job_name: &str,
) -> Result<(), GatewayError> {
    let attempts = usize::try_from(WAIT_BUDGET_SECS / STATUS_POLL_INTERVAL.as_secs()).unwrap_or(1);
    let strategy = FixedInterval::new(STATUS_POLL_INTERVAL).take(attempts);

    let poll = move || async move {
        let resp = sagemaker
            .describe_training_job()
            .training_job_name(job_name)
            .send()
            .await
            .map_err(|e| TrainingWait::Fatal(e.into()))?;
        let outcome =
            classify_training_status(resp.training_job_status(), resp.failure_reason());
        if let Err(TrainingWait::Pending(status)) = &outcome {
            info!(
                job_name = %job_name,
                status = %status,
                secondary_status = resp.secondary_status().map_or("", |s| s.as_str()),
                "Waiting for training job"
            );
        }
        outcome
    };

    match RetryIf::spawn(strategy, poll, |e: &TrainingWait| {
        matches!(e, TrainingWait::Pending(_))
    })
    .await
    {
        Ok(()) => {
            info!(job_name = %job_name, "Training job completed");
            Ok(())
        }
        Err(TrainingWait::Fatal(e)) => Err(e),
        Err(TrainingWait::Pending(status)) => Err(GatewayError::AwsError(format!(
            "training job {job_name} still {status} after {WAIT_BUDGET_SECS}s"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> TrainingConfig {
        TrainingConfig::from_lookup(|key| match key {
            "TRAIN_DATA_S3_URI" => Some("s3://bucket/train/".to_string()),
            "TRAIN_OUTPUT_S3_URI" => Some("s3://bucket/output/".to_string()),
            "TRAIN_SOURCE_S3_URI" => Some("s3://bucket/source/sourcedir.tar.gz".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn values_are_json_encoded() {
        let cfg = config();
        let encoded = encode_hyperparameters(
            &default_hyperparameters(&cfg.model_id),
            &cfg,
            "us-east-1",
            "job",
        );

        assert_eq!(encoded["do_train"], "true");
        assert_eq!(encoded["num_train_epochs"], "2");
        assert_eq!(encoded["evaluation_strategy"], "\"epoch\"");
        assert_eq!(
            encoded["model_name_or_path"],
            "\"meta-llama/Llama-3.1-8B-Instruct\""
        );
        assert_eq!(encoded["sagemaker_program"], "\"run_clm.py\"");
        assert_eq!(
            encoded["sagemaker_submit_directory"],
            "\"s3://bucket/source/sourcedir.tar.gz\""
        );
        let lr: f64 = serde_json::from_str(&encoded["learning_rate"]).unwrap();
        assert!((lr - 2e-5).abs() < f64::EPSILON);
    }

    #[test]
    fn training_status_classification() {
        assert!(classify_training_status(Some(&TrainingJobStatus::Completed), None).is_ok());
        assert!(matches!(
            classify_training_status(Some(&TrainingJobStatus::InProgress), None),
            Err(TrainingWait::Pending(_))
        ));
        assert!(matches!(
            classify_training_status(Some(&TrainingJobStatus::Stopping), None),
            Err(TrainingWait::Pending(_))
        ));
        assert!(matches!(
            classify_training_status(None, None),
            Err(TrainingWait::Pending(_))
        ));
        match classify_training_status(
            Some(&TrainingJobStatus::Failed),
            Some("AlgorithmError: ExecuteUserScriptError"),
        ) {
            Err(TrainingWait::Fatal(e)) => {
                assert!(e.to_string().contains("ExecuteUserScriptError"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        match classify_training_status(Some(&TrainingJobStatus::Stopped), None) {
            Err(TrainingWait::Fatal(e)) => {
                assert!(e.to_string().contains("no failure reason given"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn job_name_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            training_job_name(now),
            "huggingface-pytorch-training-2024-01-02-03-04-05-000"
        );
    }
}
