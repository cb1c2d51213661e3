use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE: &str = "softwaremill/elasticmq";
const TAG: &str = "latest";
const CONFIG_PATH: &str = "/opt/elasticmq.conf";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqsDockerContainerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// ElasticMQ configuration declaring the queues.
    pub config_file_path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_hostname() -> String {
    "sqs".to_string()
}

fn default_port() -> u16 {
    9324
}

impl SqsDockerContainerConfig {
    pub fn new(config_file_path: impl Into<PathBuf>) -> Self {
        Self {
            hostname: default_hostname(),
            config_file_path: config_file_path.into(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqsDockerContainer {
    container: DockerContainer,
    config: SqsDockerContainerConfig,
}

impl SqsDockerContainer {
    pub fn new(mut config: SqsDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(config.port)),
            config,
        }
    }

    pub fn config(&self) -> &SqsDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(self.config.port)
            .with_copy(&self.config.config_file_path, CONFIG_PATH)
    }

    pub fn internal_endpoint(&self) -> String {
        format!("http://{}:{}", self.config.hostname, self.config.port)
    }
}

#[async_trait]
impl StartableDockerContainer for SqsDockerContainer {
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
    fn test_container_spec_copies_config() {
        let sqs = SqsDockerContainer::new(SqsDockerContainerConfig::new(
            "tests/assets/sqs/elasticmq.conf",
        ));
        let spec = sqs.container_spec();

        assert_eq!(spec.image_reference(), "softwaremill/elasticmq:latest");
        assert_eq!(spec.exposed_port, Some(9324));
        assert_eq!(spec.copies[0].target, "/opt/elasticmq.conf");
        assert_eq!(sqs.internal_endpoint(), "http://sqs:9324");
    }

    #[test]
    fn test_empty_hostname_falls_back_to_default() {
        let mut config = SqsDockerContainerConfig::new("tests/assets/sqs/elasticmq.conf");
        config.hostname = String::new();

        let sqs = SqsDockerContainer::new(config);
        assert_eq!(sqs.container_spec().hostname, "sqs");
        assert_eq!(sqs.hostname(), "sqs");
    }
}
