use anyhow::{Context, Result};
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sagemaker::Client as SageMakerClient;
use aws_sdk_ssm::Client as SsmClient;
use sagebridge::clients::SageMakerInferenceClient;
use sagebridge::core::config::DeployConfig;
use sagebridge::provision::{
    deploy_model, image, resolve_execution_role, resolve_hub_token, smoke_test,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    sagebridge::setup_logging();

    let config = DeployConfig::from_env().map_err(anyhow::Error::msg)?;
    let shared_config = aws_config::from_env().load().await;
    let region = config
        .region
        .clone()
        .or_else(|| shared_config.region().map(ToString::to_string))
        .context("AWS region is not configured")?;

    let hub_token = resolve_hub_token(&config.hub_token, &SsmClient::new(&shared_config)).await?;
    let role_arn =
        resolve_execution_role(config.role_arn.as_deref(), &IamClient::new(&shared_config))
            .await?;
    let image_uri = match &config.image_uri {
        Some(uri) => uri.clone(),
        None => image::tgi_image_uri(&region, &config.tgi_version)?,
    };
    info!(role_arn = %role_arn, image_uri = %image_uri, region = %region, "Deploying model");

    let deployment = deploy_model(
        &SageMakerClient::new(&shared_config),
        &config,
        &role_arn,
        &image_uri,
        &hub_token,
    )
    .await?;

    let runtime = SageMakerInferenceClient::new(aws_sdk_sagemakerruntime::Client::new(
        &shared_config,
    ));
    let output = smoke_test(&runtime, &deployment.endpoint_name).await?;
    info!(endpoint_name = %deployment.endpoint_name, "Smoke test response: {}", output);
    println!("{output}");

    Ok(())
}
