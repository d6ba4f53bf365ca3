//! One-shot provisioning: model deployment and fine-tuning job launch

pub mod deploy;
pub mod hub_token;
pub mod image;
pub mod role;
pub mod training;

pub use deploy::{Deployment, deploy_model, smoke_test};
pub use hub_token::resolve_hub_token;
pub use role::resolve_execution_role;
pub use training::launch_training_job;
