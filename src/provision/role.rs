use aws_sdk_iam::Client as IamClient;
use tracing::info;

use crate::errors::GatewayError;

pub const FALLBACK_ROLE_NAME: &str = "sagemaker_execution_role";

/// Returns the configured role ARN, or looks up the fallback role in IAM.
///
/// # Errors
///
/// Returns an error if the IAM lookup fails.
pub async fn resolve_execution_role(
    configured: Option<&str>,
    iam: &IamClient,
) -> Result<String, GatewayError> {
    if let Some(arn) = configured {
        return Ok(arn.to_string());
    }

    info!(role_name = FALLBACK_ROLE_NAME, "No role configured, looking up in IAM");
    let resp = iam
        .get_role()
        .role_name(FALLBACK_ROLE_NAME)
        .send()
        .await?;

    resp.role()
        .map(|role| role.arn().to_string())
        .ok_or_else(|| GatewayError::AwsError(format!("role {FALLBACK_ROLE_NAME} not found")))
}
