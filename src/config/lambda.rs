use crate::config::aws::AwsSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, validate_url, Validate};

/// Environment of the test Lambda. Every sink is optional; the function
/// skips the ones that are not configured.
#[derive(Debug, Clone, Default)]
pub struct LambdaConfig {
    pub api_endpoint: Option<String>,
    pub sqs_endpoint: Option<String>,
    pub sqs_queue_name: Option<String>,
    pub sns_endpoint: Option<String>,
    pub sns_topic_arn: Option<String>,
    pub dynamodb_endpoint: Option<String>,
    pub dynamodb_table_name: Option<String>,
    pub ssm_endpoint: Option<String>,
    pub db_url_parameter: String,
    pub aws: AwsSettings,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let dynamodb_endpoint = match (var("DYNAMODB_HOSTNAME"), var("DYNAMODB_PORT")) {
            (Some(host), Some(port)) => Some(format!("http://{}:{}", host, port)),
            _ => None,
        };

        Self {
            api_endpoint: var("API_ENDPOINT"),
            sqs_endpoint: var("SQS_ENDPOINT"),
            sqs_queue_name: var("SQS_QUEUE_NAME"),
            sns_endpoint: var("SNS_ENDPOINT"),
            sns_topic_arn: var("SNS_TOPIC_ARN"),
            dynamodb_endpoint,
            dynamodb_table_name: var("DYNAMODB_TABLE_NAME"),
            ssm_endpoint: var("SSM_ENDPOINT"),
            db_url_parameter: var("DB_URL_PARAMETER").unwrap_or_else(|| "/db-url".to_string()),
            aws: AwsSettings {
                region: var("AWS_REGION").unwrap_or_else(|| crate::config::aws::DEFAULT_REGION.to_string()),
                access_key_id: var("AWS_ACCESS_KEY_ID").unwrap_or_else(|| "x".to_string()),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY").unwrap_or_else(|| "x".to_string()),
            },
        }
    }

    pub fn sqs_target(&self) -> Option<(&str, &str)> {
        Some((self.sqs_endpoint.as_deref()?, self.sqs_queue_name.as_deref()?))
    }

    pub fn sns_target(&self) -> Option<(&str, &str)> {
        Some((self.sns_endpoint.as_deref()?, self.sns_topic_arn.as_deref()?))
    }

    pub fn dynamodb_target(&self) -> Option<(&str, &str)> {
        Some((
            self.dynamodb_endpoint.as_deref()?,
            self.dynamodb_table_name.as_deref()?,
        ))
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        let api_endpoint = validate_required_field("API_ENDPOINT", &self.api_endpoint)?;
        validate_url("API_ENDPOINT", api_endpoint)?;

        for (field, endpoint) in [
            ("SQS_ENDPOINT", &self.sqs_endpoint),
            ("SNS_ENDPOINT", &self.sns_endpoint),
            ("DYNAMODB_HOSTNAME", &self.dynamodb_endpoint),
            ("SSM_ENDPOINT", &self.ssm_endpoint),
        ] {
            if let Some(endpoint) = endpoint {
                validate_url(field, endpoint)?;
            }
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
