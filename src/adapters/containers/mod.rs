pub mod dynamodb;
pub mod flyway;
pub mod lambda;
pub mod postgres;
pub mod sns;
pub mod sqs;
pub mod wiremock;

pub use dynamodb::{DynamoDbDockerContainer, DynamoDbDockerContainerConfig};
pub use flyway::{FlywayDockerContainer, FlywayDockerContainerConfig};
pub use lambda::{LambdaDockerContainer, LambdaDockerContainerConfig};
pub use postgres::{PostgresDockerContainer, PostgresDockerContainerConfig};
pub use sns::{SnsDockerContainer, SnsDockerContainerConfig};
pub use sqs::{SqsDockerContainer, SqsDockerContainerConfig};
pub use wiremock::{WiremockDockerContainer, WiremockDockerContainerConfig};
