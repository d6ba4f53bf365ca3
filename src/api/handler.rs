//! API Lambda handler - forwards user input to the SageMaker endpoint.
//!
//! This module handles:
//! - CORS preflight (`OPTIONS`) requests
//! - Extracting `input` from the JSON request body
//! - Invoking the configured inference endpoint with `{"inputs": input}`
//! - Mapping the endpoint output, or any failure, to an HTTP-shaped response

use super::{helpers, parsing};
use crate::clients::InferenceEndpoint;
use crate::core::config::AppConfig;
use crate::core::models::{ApiResponse, InferenceRequest};
use crate::errors::GatewayError;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

const PREFLIGHT_METHOD: &str = "OPTIONS";

/// Stateless request handler bound to one endpoint and one inference client.
pub struct RequestHandler<C> {
    config: AppConfig,
    client: C,
}

impl<C: InferenceEndpoint> RequestHandler<C> {
    pub fn new(config: AppConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Produces exactly one response for the event. Failures never escape:
    /// they become a 500 with the failure text under `error`.
    pub async fn handle(&self, event: &Value) -> ApiResponse {
        let method = parsing::request_method(event);

        if method == PREFLIGHT_METHOD {
            info!("Answering CORS preflight");
            return helpers::preflight();
        }

        match self.forward(event).await {
            Ok(result) => helpers::ok_response(&result),
            Err(e) => {
                error!(method = %method, "Request failed: {}", e);
                helpers::err_response(500, &e.to_string())
            }
        }
    }

    async fn forward(&self, event: &Value) -> Result<Value, GatewayError> {
        let input = parsing::extract_input(event)?;
        let request = InferenceRequest::new(input);

        self.client
            .invoke(&self.config.endpoint_name, &request)
            .await
    }
}

/// Lambda handler for the API entrypoint.
///
/// Always returns `Ok`; errors are reported in the response payload.
#[tracing::instrument(level = "info", skip(handler, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler<C: InferenceEndpoint>(
    handler: &RequestHandler<C>,
    event: LambdaEvent<Value>,
) -> Result<ApiResponse, Error> {
    info!(
        endpoint_name = %handler.config().endpoint_name,
        "Incoming event: {}",
        event.payload
    );

    Ok(handler.handle(&event.payload).await)
}
