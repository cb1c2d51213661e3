use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const IMAGE: &str = "amazon/dynamodb-local";
const TAG: &str = "latest";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamoDbDockerContainerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_hostname() -> String {
    "dynamodb".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for DynamoDbDockerContainerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DynamoDbDockerContainer {
    container: DockerContainer,
    config: DynamoDbDockerContainerConfig,
}

impl DynamoDbDockerContainer {
    pub fn new(mut config: DynamoDbDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(config.port)),
            config,
        }
    }

    pub fn config(&self) -> &DynamoDbDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(self.config.port)
            .with_entrypoint(
                "java",
                ["-jar", "DynamoDBLocal.jar", "-inMemory", "-sharedDb"],
            )
    }
}

#[async_trait]
impl StartableDockerContainer for DynamoDbDockerContainer {
    fn hostname(&self) -> &str {
        self.container.hostname()
    }

    async fn mapped_port(&self) -> Result<u16> {
        self.container.mapped_port().await
    }

    async fn start_using(&self, network: &DockerNetwork) -> Result<()> {
        self.container.start(self.container_spec(), network).await
    }

    async fn stop(&self) -> Result<()> {
        self.container.stop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_spec_runs_in_memory() {
        let spec = DynamoDbDockerContainer::new(DynamoDbDockerContainerConfig::default())
            .container_spec();

        assert_eq!(spec.image_reference(), "amazon/dynamodb-local:latest");
        assert_eq!(spec.exposed_port, Some(8000));
        assert_eq!(spec.entrypoint.as_deref(), Some("java"));
        assert_eq!(
            spec.cmd,
            vec!["-jar", "DynamoDBLocal.jar", "-inMemory", "-sharedDb"]
        );
    }

    #[test]
    fn test_empty_hostname_falls_back_to_default() {
        let dynamodb = DynamoDbDockerContainer::new(DynamoDbDockerContainerConfig {
            hostname: String::new(),
            port: 8000,
        });
        assert_eq!(dynamodb.container_spec().hostname, "dynamodb");
        assert_eq!(dynamodb.hostname(), "dynamodb");
    }
}
