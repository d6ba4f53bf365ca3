//! Launches the Llama fine-tuning job and waits for it to finish.
//!
//! The training container runs `run_clm.py` from the transformers
//! `examples/pytorch/language-modeling` directory (tag `v4.36.0`). Package
//! that directory once and point `TRAIN_SOURCE_S3_URI` at the result:
//!
//! ```text
//! git clone --depth 1 --branch v4.36.0 https://github.com/huggingface/transformers.git
//! tar -czf sourcedir.tar.gz -C transformers/examples/pytorch/language-modeling .
//! aws s3 cp sourcedir.tar.gz s3://<bucket>/source/sourcedir.tar.gz
//! ```
//!
//! The tarball must hold `run_clm.py` (or `TRAIN_ENTRY_POINT`) at its root;
//! a `requirements.txt` next to it is installed before the script starts.
//! Exits non-zero if the job ends `Failed` or `Stopped`.

use anyhow::{Context, Result};
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sagemaker::Client as SageMakerClient;
use sagebridge::core::config::TrainingConfig;
use sagebridge::provision::{image, launch_training_job, resolve_execution_role};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    sagebridge::setup_logging();

    let config = TrainingConfig::from_env().map_err(anyhow::Error::msg)?;
    let shared_config = aws_config::from_env().load().await;
    let region = config
        .region
        .clone()
        .or_else(|| shared_config.region().map(ToString::to_string))
        .context("AWS region is not configured")?;

    let role_arn =
        resolve_execution_role(config.role_arn.as_deref(), &IamClient::new(&shared_config))
            .await?;
    let image_uri = match &config.image_uri {
        Some(uri) => uri.clone(),
        None => image::training_image_uri(
            &region,
            &config.pytorch_version,
            &config.transformers_version,
            &config.py_version,
        )?,
    };

    let job_name = launch_training_job(
        &SageMakerClient::new(&shared_config),
        &config,
        &role_arn,
        &image_uri,
        &region,
    )
    .await?;
    info!(job_name = %job_name, "Training job finished");
    println!("{job_name}");

    Ok(())
}
