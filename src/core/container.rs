use crate::core::network::DockerNetwork;
use crate::core::spec::ContainerSpec;
use crate::utils::error::{HarnessError, Result};
use std::fmt;
use std::sync::Arc;
use testcontainers::core::{ExecCommand, IntoContainerPort};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use tokio::sync::RwLock;

/// Shared handle to one running container.
#[derive(Clone)]
pub struct DockerContainer {
    hostname: String,
    internal_service_port: Option<u16>,
    running: Arc<RwLock<Option<ContainerAsync<GenericImage>>>>,
}

impl DockerContainer {
    pub fn new(hostname: impl Into<String>, internal_service_port: Option<u16>) -> Self {
        Self {
            hostname: hostname.into(),
            internal_service_port,
            running: Arc::new(RwLock::new(None)),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn internal_service_port(&self) -> Option<u16> {
        self.internal_service_port
    }

    pub async fn is_running(&self) -> bool {
        self.running.read().await.is_some()
    }

    pub async fn start(&self, spec: ContainerSpec, network: &DockerNetwork) -> Result<()> {
        let mut running = self.running.write().await;
        if running.is_some() {
            return Err(HarnessError::ConfigError {
                message: format!("container {} is already running", self.hostname),
            });
        }

        tracing::debug!(
            "Creating container {} from {} on network {}",
            self.hostname,
            spec.image_reference(),
            network.name()
        );
        let container = spec.into_request(network).start().await?;
        tracing::info!("🐳 Started container {} ({})", self.hostname, container.id());

        *running = Some(container);
        Ok(())
    }

    pub async fn mapped_port(&self) -> Result<u16> {
        let port = self
            .internal_service_port
            .ok_or_else(|| HarnessError::NoExposedPortError {
                hostname: self.hostname.clone(),
            })?;

        let running = self.running.read().await;
        let container = running.as_ref().ok_or_else(|| self.not_started())?;
        Ok(container.get_host_port_ipv4(port.tcp()).await?)
    }

    pub async fn stop(&self) -> Result<()> {
        let container = self.running.write().await.take();
        match container {
            Some(container) => {
                tracing::debug!("Removing container {}", self.hostname);
                container.rm().await?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Everything the container wrote so far, stdout followed by stderr.
    pub async fn logs(&self) -> Result<String> {
        let running = self.running.read().await;
        let container = running.as_ref().ok_or_else(|| self.not_started())?;

        let mut output = container.stdout_to_vec().await?;
        output.extend(container.stderr_to_vec().await?);
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Runs `command` inside the container and returns its stdout.
    pub async fn exec(&self, command: &[&str]) -> Result<Vec<u8>> {
        let running = self.running.read().await;
        let container = running.as_ref().ok_or_else(|| self.not_started())?;

        let mut result = container
            .exec(ExecCommand::new(command.iter().copied()))
            .await?;
        Ok(result.stdout_to_vec().await?)
    }

    fn not_started(&self) -> HarnessError {
        HarnessError::NotStartedError {
            hostname: self.hostname.clone(),
        }
    }
}

impl fmt::Debug for DockerContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerContainer")
            .field("hostname", &self.hostname)
            .field("internal_service_port", &self.internal_service_port)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mapped_port_before_start_fails() {
        let container = DockerContainer::new("sqs", Some(9324));
        let err = container.mapped_port().await.unwrap_err();
        assert!(matches!(err, HarnessError::NotStartedError { .. }));
    }

    #[tokio::test]
    async fn test_mapped_port_without_service_port_fails() {
        let container = DockerContainer::new("flyway", None);
        let err = container.mapped_port().await.unwrap_err();
        assert!(matches!(err, HarnessError::NoExposedPortError { .. }));
    }

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let container = DockerContainer::new("wiremock", Some(8080));
        tokio_test::assert_ok!(container.stop().await);
        assert!(!container.is_running().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let container = DockerContainer::new("lambda", Some(9001));
        let clone = container.clone();
        assert_eq!(clone.hostname(), "lambda");
        assert_eq!(clone.internal_service_port(), Some(9001));
        tokio_test::assert_err!(clone.logs().await);
    }
}
