use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::model::SnsLogEntry;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::{HarnessError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE: &str = "warrenseine/sns";
const TAG: &str = "latest";
const SERVICE_PORT: u16 = 9911;
const CONFIG_PATH: &str = "/etc/sns/sns.json";
const LOG_PATH: &str = "/tmp/sns.log";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsDockerContainerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Topic and subscription definitions for the emulator.
    pub config_file_path: PathBuf,
}

fn default_hostname() -> String {
    "sns".to_string()
}

impl SnsDockerContainerConfig {
    pub fn new(config_file_path: impl Into<PathBuf>) -> Self {
        Self {
            hostname: default_hostname(),
            config_file_path: config_file_path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnsDockerContainer {
    container: DockerContainer,
    config: SnsDockerContainerConfig,
}

impl SnsDockerContainer {
    pub fn new(mut config: SnsDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(SERVICE_PORT)),
            config,
        }
    }

    pub fn config(&self) -> &SnsDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(SERVICE_PORT)
            .with_copy(&self.config.config_file_path, CONFIG_PATH)
    }

    pub fn internal_endpoint(&self) -> String {
        format!("http://{}:{}", self.config.hostname, SERVICE_PORT)
    }

    pub async fn get_messages(&self) -> Result<Vec<SnsLogEntry>> {
        let log = self
            .container
            .exec(&["cat", LOG_PATH])
            .await
            .map_err(|e| e.context(format!("reading {} from container", LOG_PATH)))?;
        parse_sns_log(&log)
    }

    /// Message body of the most recent notification.
    pub async fn get_message(&self) -> Result<String> {
        last_message(self.get_messages().await?, &self.config.hostname)
    }
}

fn last_message(mut entries: Vec<SnsLogEntry>, hostname: &str) -> Result<String> {
    entries
        .pop()
        .map(|entry| entry.message)
        .ok_or_else(|| HarnessError::NoMessagesError {
            hostname: hostname.to_string(),
            path: LOG_PATH.to_string(),
        })
}

/// The emulator appends one JSON document per notification.
pub fn parse_sns_log(log: &[u8]) -> Result<Vec<SnsLogEntry>> {
    serde_json::Deserializer::from_slice(log)
        .into_iter::<SnsLogEntry>()
        .map(|entry| entry.map_err(HarnessError::from))
        .collect()
}

#[async_trait]
impl StartableDockerContainer for SnsDockerContainer {
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
