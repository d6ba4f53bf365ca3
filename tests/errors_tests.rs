use aws_sdk_sagemaker::error::SdkError;
use sagebridge::errors::GatewayError;
use std::error::Error;

#[test]
fn test_gateway_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = GatewayError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_gateway_error_display() {
    let error = GatewayError::MissingField("input".to_string());
    assert_eq!(format!("{error}"), "Missing required field: input");

    let error = GatewayError::InferenceError("endpoint timed out".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to invoke inference endpoint: endpoint timed out"
    );

    let error = GatewayError::InvalidResponse("body is not JSON".to_string());
    assert_eq!(
        format!("{error}"),
        "Invalid response from inference endpoint: body is not JSON"
    );
}

#[test]
fn test_gateway_error_from_serde_json() {
    let err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
    let gateway_err: GatewayError = err.into();

    match gateway_err {
        GatewayError::ParseError(msg) => assert!(msg.contains("expected")),
        other => panic!("Unexpected error type: {other:?}"),
    }
}

#[test]
fn test_gateway_error_from_sdk_error_keeps_cause() {
    let err: SdkError<std::io::Error, ()> =
        SdkError::construction_failure("RoleName must not be empty");
    let gateway_err = GatewayError::from(err);

    match &gateway_err {
        GatewayError::AwsError(msg) => assert!(msg.contains("RoleName must not be empty")),
        other => panic!("Unexpected error type: {other:?}"),
    }
    assert!(gateway_err.to_string().starts_with("Failed to interact with AWS services"));
}
