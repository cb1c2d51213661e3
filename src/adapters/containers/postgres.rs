use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const IMAGE: &str = "postgres";
const TAG: &str = "13";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresDockerContainerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Passed straight through, e.g. `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB`.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

fn default_hostname() -> String {
    "postgres".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Default for PostgresDockerContainerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            environment: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresDockerContainer {
    container: DockerContainer,
    config: PostgresDockerContainerConfig,
}

impl PostgresDockerContainer {
    pub fn new(mut config: PostgresDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(config.port)),
            config,
        }
    }

    pub fn config(&self) -> &PostgresDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(self.config.port)
            .with_env(self.config.environment.clone())
    }

    /// Connection string for clients on the host.
    pub async fn connection_string(&self, user: &str, password: &str, database: &str) -> Result<String> {
        Ok(format!(
            "postgres://{}:{}@localhost:{}/{}",
            user,
            password,
            self.mapped_port().await?,
            database
        ))
    }

    /// Connection string for other containers on the network.
    pub fn internal_connection_string(&self, user: &str, password: &str, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            user, password, self.config.hostname, self.config.port, database
        )
    }
}

#[async_trait]
impl StartableDockerContainer for PostgresDockerContainer {
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
