use crate::core::network::DockerNetwork;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A container that can join a [`DockerNetwork`].
///
/// Implementations are cheap handles: cloning one and handing the clone to a
/// network lets the caller keep reaching the same container once it runs.
#[async_trait]
pub trait StartableDockerContainer: Send + Sync {
    fn hostname(&self) -> &str;

    /// Host port Docker bound to the container's internal service port.
    async fn mapped_port(&self) -> Result<u16>;

    async fn start_using(&self, network: &DockerNetwork) -> Result<()>;

    /// Terminates and removes the container. No-op if it never started.
    async fn stop(&self) -> Result<()>;
}
