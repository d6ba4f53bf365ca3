use aws_sdk_ssm::Client as SsmClient;
use tracing::info;

use crate::core::config::{HubTokenSource, TOKEN_PLACEHOLDER};
use crate::errors::GatewayError;

/// Rejects empty tokens and the unedited placeholder.
pub fn validate_hub_token(token: &str) -> Result<(), GatewayError> {
    let token = token.trim();
    if token.is_empty() || token == TOKEN_PLACEHOLDER {
        return Err(GatewayError::ConfigError(
            "You have to provide a Hugging Face hub token.".to_string(),
        ));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the SSM lookup fails or the token is missing or a placeholder.
pub async fn resolve_hub_token(
    source: &HubTokenSource,
    ssm: &SsmClient,
) -> Result<String, GatewayError> {
    let token = match source {
        HubTokenSource::Inline(token) => token.clone(),
        HubTokenSource::Parameter(name) => {
            info!(parameter = %name, "Reading hub token from SSM");
            let resp = ssm
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await?;

            resp.parameter
                .and_then(|p| p.value)
                .ok_or_else(|| {
                    GatewayError::ConfigError(format!("SSM parameter {name} has no value"))
                })?
        }
    };

    validate_hub_token(&token)?;
    Ok(token)
}
