use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sqs::config::{Credentials, Region};
use std::env;

pub const DEFAULT_REGION: &str = "eu-west-1";

/// Region and static credentials for talking to local AWS emulators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            access_key_id: "x".to_string(),
            secret_access_key: "x".to_string(),
        }
    }
}

impl AwsSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            region: non_empty_var("AWS_REGION").unwrap_or(defaults.region),
            access_key_id: non_empty_var("AWS_ACCESS_KEY_ID").unwrap_or(defaults.access_key_id),
            secret_access_key: non_empty_var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or(defaults.secret_access_key),
        }
    }

    pub async fn sdk_config(&self, endpoint: &str) -> SdkConfig {
        tracing::debug!("Loading AWS config for {} in {}", endpoint, self.region);
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(Credentials::new(
                self.access_key_id.clone(),
                self.secret_access_key.clone(),
                None,
                None,
                "lambda-testnet",
            ))
            .endpoint_url(endpoint)
            .load()
            .await
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
