pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::clients::{DynamoDbClient, SqsClient};
pub use adapters::containers::{
    DynamoDbDockerContainer, DynamoDbDockerContainerConfig, FlywayDockerContainer,
    FlywayDockerContainerConfig, LambdaDockerContainer, LambdaDockerContainerConfig,
    PostgresDockerContainer, PostgresDockerContainerConfig, SnsDockerContainer,
    SnsDockerContainerConfig, SqsDockerContainer, SqsDockerContainerConfig,
    WiremockDockerContainer, WiremockDockerContainerConfig,
};
pub use config::{ContainerNetwork, NetworkFile};
pub use core::network::{DockerNetwork, NetworkOfDockerContainers};
pub use domain::ports::StartableDockerContainer;
pub use utils::error::{HarnessError, Result};
