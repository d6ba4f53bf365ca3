use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to invoke inference endpoint: {0}")]
    InferenceError(String),

    #[error("Invalid response from inference endpoint: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        GatewayError::ParseError(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<aws_sdk_sagemaker::error::SdkError<E, R>> for GatewayError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: aws_sdk_sagemaker::error::SdkError<E, R>) -> Self {
        GatewayError::AwsError(aws_sdk_sagemaker::error::DisplayErrorContext(&error).to_string())
    }
}

impl From<aws_sdk_sagemaker::error::BuildError> for GatewayError {
    fn from(error: aws_sdk_sagemaker::error::BuildError) -> Self {
        GatewayError::ConfigError(error.to_string())
    }
}
