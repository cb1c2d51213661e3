use crate::adapters::containers::{
    DynamoDbDockerContainer, DynamoDbDockerContainerConfig, FlywayDockerContainer,
    FlywayDockerContainerConfig, LambdaDockerContainer, LambdaDockerContainerConfig,
    PostgresDockerContainer, PostgresDockerContainerConfig, SnsDockerContainer,
    SnsDockerContainerConfig, SqsDockerContainer, SqsDockerContainerConfig,
    WiremockDockerContainer, WiremockDockerContainerConfig,
};
use crate::core::network::NetworkOfDockerContainers;
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::{validate_hostname, validate_path, validate_port, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// TOML description of which containers to boot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    #[serde(default)]
    pub network: NetworkSettings,
    pub lambda: Option<LambdaDockerContainerConfig>,
    pub wiremock: Option<WiremockDockerContainerConfig>,
    pub sqs: Option<SqsDockerContainerConfig>,
    pub sns: Option<SnsDockerContainerConfig>,
    pub dynamodb: Option<DynamoDbDockerContainerConfig>,
    pub postgres: Option<PostgresDockerContainerConfig>,
    pub flyway: Option<FlywayDockerContainerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_start_delay_seconds")]
    pub start_delay_seconds: u64,
}

fn default_start_delay_seconds() -> u64 {
    2
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            start_delay_seconds: default_start_delay_seconds(),
        }
    }
}

/// Typed handles to the containers a [`NetworkFile`] declared. Each handle
/// shares state with the copy held by `network`.
#[derive(Clone, Default)]
pub struct ContainerNetwork {
    pub network: NetworkOfDockerContainers,
    pub start_delay: Duration,
    pub lambda: Option<LambdaDockerContainer>,
    pub wiremock: Option<WiremockDockerContainer>,
    pub sqs: Option<SqsDockerContainer>,
    pub sns: Option<SnsDockerContainer>,
    pub dynamodb: Option<DynamoDbDockerContainer>,
    pub postgres: Option<PostgresDockerContainer>,
    pub flyway: Option<FlywayDockerContainer>,
}

impl ContainerNetwork {
    pub async fn start(&mut self) -> Result<()> {
        self.network.start_with_delay(self.start_delay).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.network.stop().await
    }
}

impl NetworkFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarnessError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content).map_err(|e| HarnessError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;
        let mut document = toml::Value::Table(table);
        Self::substitute_env_vars(&mut document, &Regex::new(r"\$\{([^}]+)\}")?);

        document.try_into().map_err(|e| HarnessError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` inside string values with the variable's value.
    /// Unknown variables stay as written. Runs on the parsed document, so
    /// values are never reinterpreted as TOML.
    fn substitute_env_vars(value: &mut toml::Value, re: &Regex) {
        match value {
            toml::Value::String(text) => {
                let replaced = re
                    .replace_all(text, |caps: &regex::Captures| {
                        let var_name = &caps[1];
                        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                    })
                    .into_owned();
                *text = replaced;
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_env_vars(item, re);
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    Self::substitute_env_vars(item, re);
                }
            }
            _ => {}
        }
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_secs(self.network.start_delay_seconds)
    }

    fn hostnames(&self) -> Vec<(&'static str, &str)> {
        let mut hostnames = Vec::new();
        if let Some(c) = &self.lambda {
            hostnames.push(("lambda.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.wiremock {
            hostnames.push(("wiremock.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.sqs {
            hostnames.push(("sqs.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.sns {
            hostnames.push(("sns.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.dynamodb {
            hostnames.push(("dynamodb.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.postgres {
            hostnames.push(("postgres.hostname", c.hostname.as_str()));
        }
        if let Some(c) = &self.flyway {
            hostnames.push(("flyway.hostname", c.hostname.as_str()));
        }
        hostnames
    }

    /// Builds the network. Containers start in the order Wiremock, SQS, SNS,
    /// DynamoDB, Postgres, Flyway, Lambda so the function's dependencies come
    /// up first.
    pub fn build_network(&self) -> ContainerNetwork {
        let mut built = ContainerNetwork {
            start_delay: self.start_delay(),
            ..Default::default()
        };
        let mut network = NetworkOfDockerContainers::new();

        if let Some(config) = &self.wiremock {
            let container = WiremockDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.wiremock = Some(container);
        }
        if let Some(config) = &self.sqs {
            let container = SqsDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.sqs = Some(container);
        }
        if let Some(config) = &self.sns {
            let container = SnsDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.sns = Some(container);
        }
        if let Some(config) = &self.dynamodb {
            let container = DynamoDbDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.dynamodb = Some(container);
        }
        if let Some(config) = &self.postgres {
            let container = PostgresDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.postgres = Some(container);
        }
        if let Some(config) = &self.flyway {
            let container = FlywayDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.flyway = Some(container);
        }
        if let Some(config) = &self.lambda {
            let container = LambdaDockerContainer::new(config.clone());
            network = network.with_docker_container(container.clone());
            built.lambda = Some(container);
        }

        built.network = network;
        built
    }
}

impl Validate for NetworkFile {
    fn validate(&self) -> Result<()> {
        let hostnames = self.hostnames();
        if hostnames.is_empty() {
            return Err(HarnessError::ConfigError {
                message: "network file declares no containers".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (field, hostname) in hostnames {
            validate_hostname(field, hostname)?;
            if !seen.insert(hostname) {
                return Err(HarnessError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: hostname.to_string(),
                    reason: "Hostname is already used by another container".to_string(),
                });
            }
        }

        if let Some(c) = &self.lambda {
            validate_path("lambda.executable", &c.executable.to_string_lossy())?;
        }
        if let Some(c) = &self.wiremock {
            validate_path("wiremock.json_mappings", &c.json_mappings.to_string_lossy())?;
        }
        if let Some(c) = &self.sqs {
            validate_path("sqs.config_file_path", &c.config_file_path.to_string_lossy())?;
            validate_port("sqs.port", c.port)?;
        }
        if let Some(c) = &self.sns {
            validate_path("sns.config_file_path", &c.config_file_path.to_string_lossy())?;
        }
        if let Some(c) = &self.dynamodb {
            validate_port("dynamodb.port", c.port)?;
        }
        if let Some(c) = &self.postgres {
            validate_port("postgres.port", c.port)?;
        }
        if let Some(c) = &self.flyway {
            validate_path("flyway.sql_files_path", &c.sql_files_path.to_string_lossy())?;
            validate_path(
                "flyway.config_files_path",
                &c.config_files_path.to_string_lossy(),
            )?;
        }

        tracing::debug!("✅ Network file validation passed");
        Ok(())
    }
}
