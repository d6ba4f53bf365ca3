//! SageMaker runtime client module
//!
//! Wraps `InvokeEndpoint` behind a trait so the API handler can be driven
//! by a stub endpoint in tests.

use async_trait::async_trait;
use aws_sdk_sagemakerruntime::{Client as RuntimeClient, primitives::Blob};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::models::InferenceRequest;
use crate::errors::GatewayError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A remote model endpoint that accepts a JSON request and returns JSON.
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    async fn invoke(
        &self,
        endpoint_name: &str,
        request: &InferenceRequest,
    ) -> Result<Value, GatewayError>;
}

/// `InferenceEndpoint` backed by the SageMaker runtime API.
#[derive(Debug, Clone)]
pub struct SageMakerInferenceClient {
    client: RuntimeClient,
}

impl SageMakerInferenceClient {
    pub fn new(client: RuntimeClient) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env() -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(RuntimeClient::new(&shared_config))
    }
}

#[async_trait]
impl InferenceEndpoint for SageMakerInferenceClient {
    async fn invoke(
        &self,
        endpoint_name: &str,
        request: &InferenceRequest,
    ) -> Result<Value, GatewayError> {
        let payload = serde_json::to_vec(request)?;
        debug!(endpoint_name = %endpoint_name, bytes = payload.len(), "Invoking endpoint");

        let response = self
            .client
            .invoke_endpoint()
            .endpoint_name(endpoint_name)
            .content_type(JSON_CONTENT_TYPE)
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| {
                GatewayError::InferenceError(
                    aws_sdk_sagemakerruntime::error::DisplayErrorContext(&e).to_string(),
                )
            })?;

        info!(
            endpoint_name = %endpoint_name,
            invoked_variant = response.invoked_production_variant().unwrap_or(""),
            "Endpoint invocation succeeded"
        );

        decode_response_body(response.body)
    }
}

/// Decodes a raw endpoint response as UTF-8 JSON.
pub fn decode_response_body(body: Option<Blob>) -> Result<Value, GatewayError> {
    let bytes = body.map(Blob::into_inner).ok_or_else(|| {
        GatewayError::InvalidResponse("endpoint returned no body".to_string())
    })?;
    let text = String::from_utf8(bytes)
        .map_err(|e| GatewayError::InvalidResponse(format!("body is not UTF-8: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| GatewayError::InvalidResponse(format!("body is not JSON: {e}")))
}
