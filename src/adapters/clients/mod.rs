pub mod dynamodb;
pub mod sqs;

pub use dynamodb::{DynamoDbApi, DynamoDbClient};
pub use sqs::{SqsApi, SqsClient};
