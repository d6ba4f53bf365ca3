/// sagebridge - Lambda front door for a Llama model served on SageMaker.
///
/// This crate contains three entry points:
/// 1. An API Lambda that forwards `{"input": ...}` requests to a SageMaker
///    inference endpoint and answers with permissive CORS headers
/// 2. A deploy tool that stands the Hugging Face TGI container up behind that endpoint
/// 3. A training tool that launches a fine-tuning job for the same checkpoint
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - SageMaker runtime `InvokeEndpoint` for inference
/// - SageMaker control plane, IAM and SSM for provisioning
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use sagebridge::api::RequestHandler;
/// use sagebridge::clients::SageMakerInferenceClient;
/// use sagebridge::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     sagebridge::setup_logging();
///
///     let config = AppConfig {
///         endpoint_name: "llama3-endpoint".to_string(),
///     };
///     let handler = RequestHandler::new(config, SageMakerInferenceClient::from_env().await);
///
///     let event = serde_json::json!({
///         "requestContext": { "http": { "method": "POST" } },
///         "body": "{\"input\": \"Hello!\"}"
///     });
///     let response = handler.handle(&event).await;
///     println!("{}", serde_json::to_string(&response)?);
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod provision;

pub use errors::GatewayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at the start of
/// each binary.
///
/// # Example
///
/// ```
/// sagebridge::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
