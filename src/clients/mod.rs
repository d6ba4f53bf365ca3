//! Clients for the remote services the crate talks to

pub mod inference_client;

pub use inference_client::{InferenceEndpoint, SageMakerInferenceClient};
