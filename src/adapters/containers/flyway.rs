use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE: &str = "flyway/flyway";
const TAG: &str = "latest";

/// Runs `flyway migrate` once against the database named in `flyway.conf`
/// and exits. It exposes no service port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlywayDockerContainerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    pub config_files_path: PathBuf,
    pub sql_files_path: PathBuf,
}

fn default_hostname() -> String {
    "flyway".to_string()
}

impl FlywayDockerContainerConfig {
    pub fn new(config_files_path: impl Into<PathBuf>, sql_files_path: impl Into<PathBuf>) -> Self {
        Self {
            hostname: default_hostname(),
            config_files_path: config_files_path.into(),
            sql_files_path: sql_files_path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlywayDockerContainer {
    container: DockerContainer,
    config: FlywayDockerContainerConfig,
}

impl FlywayDockerContainer {
    pub fn new(mut config: FlywayDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), None),
            config,
        }
    }

    pub fn config(&self) -> &FlywayDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> Result<ContainerSpec> {
        Ok(ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_read_only_mount(&self.config.sql_files_path, "/flyway/sql")?
            .with_read_only_mount(&self.config.config_files_path, "/flyway/conf")?
            .with_entrypoint("flyway", ["migrate"]))
    }

    /// Output of the migration run.
    pub async fn log(&self) -> Result<String> {
        self.container.logs().await
    }
}

#[async_trait]
impl StartableDockerContainer for FlywayDockerContainer {
    fn hostname(&self) -> &str {
        self.container.hostname()
    }

    async fn mapped_port(&self) -> Result<u16> {
        self.container.mapped_port().await
    }

    async fn start_using(&self, network: &DockerNetwork) -> Result<()> {
        self.container.start(self.container_spec()?, network).await
    }

    async fn stop(&self) -> Result<()> {
        self.container.stop().await
    }
}
