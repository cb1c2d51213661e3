use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Container operation failed: {0}")]
    ContainerError(#[from] testcontainers::TestcontainersError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid regular expression: {0}")]
    RegexError(#[from] regex::Error),

    #[error("{service} {operation} failed: {message}")]
    AwsError {
        service: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Container {hostname} has not been started")]
    NotStartedError { hostname: String },

    #[error("Container {hostname} does not expose a service port")]
    NoExposedPortError { hostname: String },

    #[error("Unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatusError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("No messages logged by {hostname} in {path}")]
    NoMessagesError { hostname: String, path: String },

    #[error("Invalid DynamoDB item: {message}")]
    InvalidItemError { message: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<HarnessError>,
    },
}

impl HarnessError {
    pub fn aws(
        service: &'static str,
        operation: &'static str,
        err: impl std::error::Error,
    ) -> Self {
        HarnessError::AwsError {
            service,
            operation,
            message: aws_sdk_sqs::error::DisplayErrorContext(err).to_string(),
        }
    }

    pub fn context(self, context: impl Into<String>) -> Self {
        HarnessError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarnessError::ContainerError(_) => {
                "Check that the Docker daemon is running and the image can be pulled"
            }
            HarnessError::HttpError(_) | HarnessError::UnexpectedStatusError { .. } => {
                "Check that the container has finished starting; try a longer start delay"
            }
            HarnessError::IoError(_) => "Check that the referenced files exist and are readable",
            HarnessError::SerializationError(_) => {
                "Check that the service returned the expected JSON payload"
            }
            HarnessError::RegexError(_) => "Fix the regular expression",
            HarnessError::AwsError { .. } => {
                "Check the emulator configuration (queues, topics, tables) and the AWS_REGION"
            }
            HarnessError::ConfigError { .. }
            | HarnessError::MissingConfigError { .. }
            | HarnessError::InvalidConfigValueError { .. } => "Fix the network file and retry",
            HarnessError::NotStartedError { .. } | HarnessError::NoExposedPortError { .. } => {
                "Start the network before querying container ports"
            }
            HarnessError::NoMessagesError { .. } => {
                "Check that the function published to the topic before reading the log"
            }
            HarnessError::InvalidItemError { .. } => {
                "Pass a struct or map that serializes to a JSON object"
            }
            HarnessError::Context { source, .. } => source.recovery_suggestion(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_message() {
        let err = HarnessError::NotStartedError {
            hostname: "sqs".to_string(),
        }
        .context("starting docker container sqs");

        assert_eq!(
            err.to_string(),
            "starting docker container sqs: Container sqs has not been started"
        );
        assert_eq!(
            err.recovery_suggestion(),
            "Start the network before querying container ports"
        );
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = HarnessError::UnexpectedStatusError {
            url: "http://localhost:1/".to_string(),
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }
}
