//! Deploys the Hugging Face TGI container behind a SageMaker endpoint.
//!
//! Creates model -> endpoint config -> endpoint, waits for the endpoint to
//! come `InService`, then sends one smoke-test request through the same
//! client the API Lambda uses.

use aws_sdk_sagemaker::Client as SageMakerClient;
use aws_sdk_sagemaker::types::{
    ContainerDefinition, EndpointStatus, ProductionVariant, ProductionVariantInstanceType,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{info, warn};

use crate::clients::InferenceEndpoint;
use crate::core::config::DeployConfig;
use crate::core::models::InferenceRequest;
use crate::errors::GatewayError;

const VARIANT_NAME: &str = "AllTraffic";
const MAX_RESOURCE_NAME_LEN: usize = 63;
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Resources created by a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub model_name: String,
    pub endpoint_config_name: String,
    pub endpoint_name: String,
}

/// Environment handed to the TGI container.
pub fn container_environment(config: &DeployConfig, hub_token: &str) -> HashMap<String, String> {
    HashMap::from([
        ("HF_MODEL_ID".to_string(), config.model_id.clone()),
        ("SM_NUM_GPUS".to_string(), json!(config.num_gpus).to_string()),
        ("HF_TOKEN".to_string(), hub_token.to_string()),
    ])
}

/// `<base>-<kind>-<timestamp>`, with `base` shortened to fit SageMaker's name limit.
pub fn resource_name(base: &str, kind: &str, now: DateTime<Utc>) -> String {
    let suffix = format!("-{kind}-{}", now.format("%Y-%m-%d-%H-%M-%S-%3f"));
    let room = MAX_RESOURCE_NAME_LEN.saturating_sub(suffix.len());
    let base: String = base.chars().take(room).collect();
    format!("{}{suffix}", base.trim_end_matches('-'))
}

/// Smoke-test request sent once the endpoint is up.
pub fn smoke_test_request() -> InferenceRequest {
    InferenceRequest::new(json!("Hello!")).with_parameters(json!({ "max_new_tokens": 50 }))
}

#[derive(Debug)]
pub enum EndpointWait {
    Pending(String),
    Fatal(GatewayError),
}

/// Maps an endpoint status to done / keep waiting / give up.
pub fn classify_status(
    status: Option<&EndpointStatus>,
    failure_reason: Option<&str>,
) -> Result<(), EndpointWait> {
    match status {
        Some(EndpointStatus::InService) => Ok(()),
        Some(
            s @ (EndpointStatus::Failed | EndpointStatus::OutOfService | EndpointStatus::Deleting),
        ) => Err(EndpointWait::Fatal(GatewayError::AwsError(format!(
            "endpoint entered {}: {}",
            s.as_str(),
            failure_reason.unwrap_or("no failure reason given")
        )))),
        Some(s) => Err(EndpointWait::Pending(s.as_str().to_string())),
        None => Err(EndpointWait::Pending("Unknown".to_string())),
    }
}

/// # Errors
///
/// Returns an error if any SageMaker API call fails or the endpoint never becomes healthy.
pub async fn deploy_model(
    sagemaker: &SageMakerClient,
    config: &DeployConfig,
    role_arn: &str,
    image_uri: &str,
    hub_token: &str,
) -> Result<Deployment, GatewayError> {
    let now = Utc::now();
    let deployment = Deployment {
        model_name: resource_name(&config.endpoint_name, "model", now),
        endpoint_config_name: resource_name(&config.endpoint_name, "config", now),
        endpoint_name: config.endpoint_name.clone(),
    };

    info!(model_name = %deployment.model_name, image_uri = %image_uri, "Creating model");
    sagemaker
        .create_model()
        .model_name(&deployment.model_name)
        .execution_role_arn(role_arn)
        .primary_container(
            ContainerDefinition::builder()
                .image(image_uri)
                .set_environment(Some(container_environment(config, hub_token)))
                .build(),
        )
        .send()
        .await?;

    info!(
        endpoint_config_name = %deployment.endpoint_config_name,
        instance_type = %config.instance_type,
        "Creating endpoint config"
    );
    let variant = ProductionVariant::builder()
        .variant_name(VARIANT_NAME)
        .model_name(&deployment.model_name)
        .initial_instance_count(config.instance_count)
        .instance_type(ProductionVariantInstanceType::from(
            config.instance_type.as_str(),
        ))
        .container_startup_health_check_timeout_in_seconds(config.health_check_timeout_secs)
        .build();
    sagemaker
        .create_endpoint_config()
        .endpoint_config_name(&deployment.endpoint_config_name)
        .production_variants(variant)
        .send()
        .await?;

    info!(endpoint_name = %deployment.endpoint_name, "Creating endpoint");
    let created = sagemaker
        .create_endpoint()
        .endpoint_name(&deployment.endpoint_name)
        .endpoint_config_name(&deployment.endpoint_config_name)
        .send()
        .await?;
    info!("Endpoint creation started: {:?}", created);

    wait_for_endpoint(sagemaker, &deployment.endpoint_name, config).await?;

    Ok(deployment)
}

async fn wait_for_endpoint(
    sagemaker: &SageMakerClient,
    endpoint_name: &str,
    config: &DeployConfig,
) -> Result<(), GatewayError> {
    // Budget covers instance provisioning on top of the container health check.
    let budget_secs = u64::try_from(config.health_check_timeout_secs).unwrap_or(0) + 1800;
    let attempts = usize::try_from(budget_secs / STATUS_POLL_INTERVAL.as_secs()).unwrap_or(1);
    let strategy = FixedInterval::new(STATUS_POLL_INTERVAL).take(attempts);

    let poll = move || async move {
        let resp = sagemaker
            .describe_endpoint()
            .endpoint_name(endpoint_name)
            .send()
            .await
            .map_err(|e| EndpointWait::Fatal(e.into()))?;
        let outcome = classify_status(resp.endpoint_status(), resp.failure_reason());
        if let Err(EndpointWait::Pending(status)) = &outcome {
            info!(endpoint_name = %endpoint_name, status = %status, "Waiting for endpoint");
        }
        outcome
    };

    match RetryIf::spawn(strategy, poll, |e: &EndpointWait| {
        matches!(e, EndpointWait::Pending(_))
    })
    .await
    {
        Ok(()) => {
            info!(endpoint_name = %endpoint_name, "Endpoint is InService");
            Ok(())
        }
        Err(EndpointWait::Fatal(e)) => Err(e),
        Err(EndpointWait::Pending(status)) => Err(GatewayError::AwsError(format!(
            "endpoint {endpoint_name} still {status} after {budget_secs}s"
        ))),
    }
}

/// Sends the smoke-test prompt and returns the model output.
///
/// # Errors
///
/// Returns an error if the endpoint invocation fails.
pub async fn smoke_test<C: InferenceEndpoint>(
    client: &C,
    endpoint_name: &str,
) -> Result<Value, GatewayError> {
    let response = client.invoke(endpoint_name, &smoke_test_request()).await;
    if let Err(e) = &response {
        warn!(endpoint_name = %endpoint_name, "Smoke test failed: {}", e);
    }
    response
}
