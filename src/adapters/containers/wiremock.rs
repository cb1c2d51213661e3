use crate::adapters::http;
use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::model::{WiremockAdminRequest, WiremockAdminStatus};
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE: &str = "wiremock/wiremock";
const TAG: &str = "latest";
const SERVICE_PORT: u16 = 8080;
const MAPPINGS_PATH: &str = "/home/wiremock/mappings/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiremockDockerContainerConfig {
    /// Directory of JSON stub mappings, relative to the working directory.
    pub json_mappings: PathBuf,
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

fn default_hostname() -> String {
    "wiremock".to_string()
}

impl WiremockDockerContainerConfig {
    pub fn new(json_mappings: impl Into<PathBuf>) -> Self {
        Self {
            json_mappings: json_mappings.into(),
            hostname: default_hostname(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WiremockDockerContainer {
    container: DockerContainer,
    config: WiremockDockerContainerConfig,
}

impl WiremockDockerContainer {
    pub fn new(mut config: WiremockDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(SERVICE_PORT)),
            config,
        }
    }

    pub fn config(&self) -> &WiremockDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> Result<ContainerSpec> {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(SERVICE_PORT)
            .with_read_only_mount(&self.config.json_mappings, MAPPINGS_PATH)
    }

    /// The address other containers on the network use to reach Wiremock.
    pub fn internal_url(&self) -> String {
        format!("http://{}:{}/", self.config.hostname, SERVICE_PORT)
    }

    pub async fn admin_url(&self) -> Result<String> {
        Ok(format!(
            "http://localhost:{}/__admin/requests",
            self.mapped_port().await?
        ))
    }

    pub async fn get_admin_status(&self) -> Result<WiremockAdminStatus> {
        let url = self.admin_url().await?;
        let client = http::default_client()?;
        http::fetch_admin_status(&client, &url).await
    }

    /// First journalled request whose absolute URL equals `absolute_url`.
    pub async fn find_request(&self, absolute_url: &str) -> Result<Option<WiremockAdminRequest>> {
        let status = self.get_admin_status().await?;
        Ok(find_request(status, absolute_url))
    }
}

pub fn find_request(status: WiremockAdminStatus, absolute_url: &str) -> Option<WiremockAdminRequest> {
    status
        .requests
        .into_iter()
        .find(|r| r.request.absolute_url == absolute_url)
}

#[async_trait]
impl StartableDockerContainer for WiremockDockerContainer {
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
