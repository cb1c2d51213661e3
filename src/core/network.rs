use crate::domain::ports::StartableDockerContainer;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A user-defined bridge network. Docker creates it when the first container
/// joins and the container library removes it with the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerNetwork {
    name: String,
}

impl DockerNetwork {
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::named(format!("lambda-testnet-{}-{}", std::process::id(), millis))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for DockerNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Clone)]
pub struct NetworkOfDockerContainers {
    docker_network: Option<DockerNetwork>,
    docker_containers: Vec<Arc<dyn StartableDockerContainer>>,
}

impl NetworkOfDockerContainers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_docker_container<C>(mut self, docker_container: C) -> Self
    where
        C: StartableDockerContainer + 'static,
    {
        self.docker_containers.push(Arc::new(docker_container));
        self
    }

    pub fn len(&self) -> usize {
        self.docker_containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docker_containers.is_empty()
    }

    pub fn docker_network(&self) -> Option<&DockerNetwork> {
        self.docker_network.as_ref()
    }

    pub fn containers(&self) -> impl Iterator<Item = &dyn StartableDockerContainer> {
        self.docker_containers.iter().map(|c| c.as_ref())
    }

    /// Starts every container in insertion order, then waits `delay` so the
    /// services inside have time to come up.
    pub async fn start_with_delay(&mut self, delay: Duration) -> Result<()> {
        let network = self.docker_network.get_or_insert_with(DockerNetwork::new).clone();
        tracing::info!(
            "Starting {} containers on network {}",
            self.docker_containers.len(),
            network.name()
        );

        for docker_container in &self.docker_containers {
            docker_container
                .start_using(&network)
                .await
                .map_err(|e| {
                    e.context(format!(
                        "starting docker container {}",
                        docker_container.hostname()
                    ))
                })?;
        }

        if !delay.is_zero() {
            tracing::info!("Sleeping for {:?} while containers start", delay);
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        for docker_container in &self.docker_containers {
            docker_container.stop().await.map_err(|e| {
                e.context(format!(
                    "stopping docker container {}",
                    docker_container.hostname()
                ))
            })?;
        }
        if let Some(network) = &self.docker_network {
            tracing::info!("Stopped all containers on network {}", network.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HarnessError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct MockContainer {
        hostname: String,
        fail_on_start: bool,
        fail_on_stop: bool,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl MockContainer {
        fn new(hostname: &str, events: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                hostname: hostname.to_string(),
                fail_on_start: false,
                fail_on_stop: false,
                events: Arc::clone(events),
            }
        }

        fn failing(mut self) -> Self {
            self.fail_on_start = true;
            self
        }

        fn failing_to_stop(mut self) -> Self {
            self.fail_on_stop = true;
            self
        }
    }

    #[async_trait]
    impl StartableDockerContainer for MockContainer {
        fn hostname(&self) -> &str {
            &self.hostname
        }

        async fn mapped_port(&self) -> Result<u16> {
            Ok(49152)
        }

        async fn start_using(&self, network: &DockerNetwork) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} on {}", self.hostname, network.name()));
            if self.fail_on_start {
                return Err(HarnessError::ConfigError {
                    message: "image not found".to_string(),
                });
            }
            Ok(())
        }

        async fn stop(&self) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("stop {}", self.hostname));
            if self.fail_on_stop {
                return Err(HarnessError::ConfigError {
                    message: "container already removed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_start_and_stop_in_insertion_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut network = NetworkOfDockerContainers::new()
            .with_docker_container(MockContainer::new("lambda", &events))
            .with_docker_container(MockContainer::new("wiremock", &events))
            .with_docker_container(MockContainer::new("sqs", &events));

        assert_eq!(network.len(), 3);
        network.start_with_delay(Duration::ZERO).await.unwrap();
        network.stop().await.unwrap();

        let name = network.docker_network().unwrap().name().to_string();
        assert!(name.starts_with("lambda-testnet-"));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                format!("start lambda on {}", name),
                format!("start wiremock on {}", name),
                format!("start sqs on {}", name),
                "stop lambda".to_string(),
                "stop wiremock".to_string(),
                "stop sqs".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_start_stops_at_first_failure() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut network = NetworkOfDockerContainers::new()
            .with_docker_container(MockContainer::new("lambda", &events))
            .with_docker_container(MockContainer::new("wiremock", &events).failing())
            .with_docker_container(MockContainer::new("sqs", &events));

        let err = network
            .start_with_delay(Duration::ZERO)
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("starting docker container wiremock"));
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stop_returns_first_failure() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut network = NetworkOfDockerContainers::new()
            .with_docker_container(MockContainer::new("lambda", &events))
            .with_docker_container(MockContainer::new("wiremock", &events).failing_to_stop())
            .with_docker_container(MockContainer::new("sqs", &events));

        network.start_with_delay(Duration::ZERO).await.unwrap();
        events.lock().unwrap().clear();

        let err = network.stop().await.unwrap_err();

        assert!(err
            .to_string()
            .starts_with("stopping docker container wiremock: "));
        assert!(err.to_string().contains("container already removed"));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["stop lambda".to_string(), "stop wiremock".to_string()]
        );
    }

    #[tokio::test]
    async fn test_start_waits_for_delay() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut network = NetworkOfDockerContainers::new()
            .with_docker_container(MockContainer::new("sqs", &events));

        let started = tokio::time::Instant::now();
        network
            .start_with_delay(Duration::from_millis(50))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let network = NetworkOfDockerContainers::new();
        assert!(network.is_empty());
        tokio_test::assert_ok!(network.stop().await);
    }
}
