use crate::adapters::http;
use crate::core::container::DockerContainer;
use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

const IMAGE: &str = "lambci/lambda";
const TAG: &str = "provided";
const INVOCATION_PORT: u16 = 9001;
const HANDLER_PATH: &str = "/var/task/bootstrap";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaDockerContainerConfig {
    /// Path of the compiled function binary on the host.
    pub executable: PathBuf,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

fn default_hostname() -> String {
    "lambda".to_string()
}

impl LambdaDockerContainerConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            environment: BTreeMap::new(),
            hostname: default_hostname(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LambdaDockerContainer {
    container: DockerContainer,
    config: LambdaDockerContainerConfig,
}

impl LambdaDockerContainer {
    pub fn new(mut config: LambdaDockerContainerConfig) -> Self {
        if config.hostname.is_empty() {
            config.hostname = default_hostname();
        }
        Self {
            container: DockerContainer::new(config.hostname.clone(), Some(INVOCATION_PORT)),
            config,
        }
    }

    pub fn config(&self) -> &LambdaDockerContainerConfig {
        &self.config
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec::new(IMAGE, TAG, &self.config.hostname)
            .with_exposed_port(INVOCATION_PORT)
            .with_env(self.setup_environment())
            .with_copy(&self.config.executable, HANDLER_PATH)
    }

    /// Runtime defaults, overridden by the configured environment.
    fn setup_environment(&self) -> BTreeMap<String, String> {
        let mut env: BTreeMap<String, String> = [
            ("ENVIRONMENT", "dev"),
            ("AWS_REGION", "eu-west-1"),
            ("DOCKER_LAMBDA_STAY_OPEN", "1"),
            ("AWS_ACCESS_KEY_ID", "x"),
            ("AWS_SECRET_ACCESS_KEY", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        env.extend(self.config.environment.clone());
        env
    }

    pub async fn invocation_url(&self) -> Result<String> {
        Ok(format!(
            "http://localhost:{}/2015-03-31/functions/myfunction/invocations",
            self.mapped_port().await?
        ))
    }

    pub async fn invoke(&self, payload: &serde_json::Value) -> Result<String> {
        let url = self.invocation_url().await?;
        let client = http::default_client()?;
        http::invoke_lambda(&client, &url, payload).await
    }

    pub async fn log(&self) -> Result<String> {
        self.container.logs().await
    }

    pub async fn log_matches(&self, pattern: &str) -> Result<bool> {
        log_contains(&self.log().await?, pattern)
    }
}

/// Whether `log` contains a match for `pattern`.
pub fn log_contains(log: &str, pattern: &str) -> Result<bool> {
    Ok(Regex::new(pattern)?.is_match(log))
}

#[async_trait]
impl StartableDockerContainer for LambdaDockerContainer {
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
