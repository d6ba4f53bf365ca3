use lambda_runtime::{LambdaEvent, service_fn};
use sagebridge::api::{RequestHandler, handler};
use sagebridge::clients::SageMakerInferenceClient;
use sagebridge::core::config::AppConfig;
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    sagebridge::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        lambda_runtime::Error::from(e)
    })?;
    info!(endpoint_name = %config.endpoint_name, "API Lambda starting");

    let request_handler = RequestHandler::new(config, SageMakerInferenceClient::from_env().await);
    let request_handler = &request_handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(request_handler, event).await
    }))
    .await
}
