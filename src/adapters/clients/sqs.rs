use crate::config::aws::AwsSettings;
use crate::utils::error::{HarnessError, Result};
use async_trait::async_trait;
use aws_sdk_sqs::types::Message;

const MAX_NUMBER_OF_MESSAGES: i32 = 10;

/// The SQS calls the harness makes.
#[async_trait]
pub trait SqsApi: Send + Sync {
    async fn get_queue_url(&self, queue_name: &str) -> Result<String>;
    async fn receive_messages(&self, queue_url: &str, max_messages: i32) -> Result<Vec<Message>>;
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<()>;
}

#[async_trait]
impl SqsApi for aws_sdk_sqs::Client {
    async fn get_queue_url(&self, queue_name: &str) -> Result<String> {
        let output = self
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| HarnessError::aws("sqs", "GetQueueUrl", e))?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| HarnessError::AwsError {
                service: "sqs",
                operation: "GetQueueUrl",
                message: format!("no URL returned for queue {}", queue_name),
            })
    }

    async fn receive_messages(&self, queue_url: &str, max_messages: i32) -> Result<Vec<Message>> {
        let output = self
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .send()
            .await
            .map_err(|e| HarnessError::aws("sqs", "ReceiveMessage", e))?;
        Ok(output.messages.unwrap_or_default())
    }

    async fn send_message(&self, queue_url: &str, body: &str) -> Result<()> {
        self.send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| HarnessError::aws("sqs", "SendMessage", e))?;
        Ok(())
    }
}

pub struct SqsClient<C: SqsApi = aws_sdk_sqs::Client> {
    handle: C,
}

impl SqsClient {
    /// Client for an emulator reachable on `localhost:<port>`.
    pub async fn connect(port: u16) -> Self {
        let endpoint = format!("http://localhost:{}", port);
        let config = AwsSettings::from_env().sdk_config(&endpoint).await;
        Self::with_handle(aws_sdk_sqs::Client::new(&config))
    }
}

impl<C: SqsApi> SqsClient<C> {
    pub fn with_handle(handle: C) -> Self {
        Self { handle }
    }

    pub async fn get_messages_from(&self, queue: &str) -> Result<Vec<Message>> {
        let queue_url = self
            .handle
            .get_queue_url(queue)
            .await
            .map_err(|e| e.context("getting queue url"))?;

        self.handle
            .receive_messages(&queue_url, MAX_NUMBER_OF_MESSAGES)
            .await
            .map_err(|e| e.context("receiving messages"))
    }

    pub async fn send_message_to(&self, queue: &str, body: &str) -> Result<()> {
        let queue_url = self
            .handle
            .get_queue_url(queue)
            .await
            .map_err(|e| e.context("getting queue url"))?;

        self.handle
            .send_message(&queue_url, body)
            .await
            .map_err(|e| e.context("sending message"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSqsApi {
        fail_get_queue_url: bool,
        fail_receive: bool,
        messages: Vec<Message>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SqsApi for MockSqsApi {
        async fn get_queue_url(&self, queue_name: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("GetQueueUrl {}", queue_name));
            if self.fail_get_queue_url {
                return Err(HarnessError::AwsError {
                    service: "sqs",
                    operation: "GetQueueUrl",
                    message: "queue does not exist".to_string(),
                });
            }
            Ok(format!("http://sqs:9324/000000000000/{}", queue_name))
        }

        async fn receive_messages(
            &self,
            queue_url: &str,
            max_messages: i32,
        ) -> Result<Vec<Message>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("ReceiveMessage {} {}", queue_url, max_messages));
            if self.fail_receive {
                return Err(HarnessError::AwsError {
                    service: "sqs",
                    operation: "ReceiveMessage",
                    message: "error".to_string(),
                });
            }
            Ok(self.messages.clone())
        }

        async fn send_message(&self, queue_url: &str, body: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("SendMessage {} {}", queue_url, body));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_get_messages_from() {
        let mock = MockSqsApi {
            messages: vec![Message::builder().body("{\"message\":\"Hello World!\"}").build()],
            ..Default::default()
        };
        let client = SqsClient::with_handle(mock);

        let messages = client.get_messages_from("sqs-queue").await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body(), Some("{\"message\":\"Hello World!\"}"));
        assert_eq!(
            *client.handle.calls.lock().unwrap(),
            vec![
                "GetQueueUrl sqs-queue".to_string(),
                "ReceiveMessage http://sqs:9324/000000000000/sqs-queue 10".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_messages_from_get_queue_url_error() {
        let client = SqsClient::with_handle(MockSqsApi {
            fail_get_queue_url: true,
            ..Default::default()
        });

        let err = client.get_messages_from("missing").await.unwrap_err();

        assert!(err.to_string().starts_with("getting queue url"));
        assert_eq!(client.handle.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_messages_from_receive_error() {
        let client = SqsClient::with_handle(MockSqsApi {
            fail_receive: true,
            ..Default::default()
        });

        let err = client.get_messages_from("sqs-queue").await.unwrap_err();
        assert!(err.to_string().starts_with("receiving messages"));
    }

    #[tokio::test]
    async fn test_send_message_to() {
        let client = SqsClient::with_handle(MockSqsApi::default());
        client.send_message_to("sqs-queue", "hello").await.unwrap();

        let calls = client.handle.calls.lock().unwrap();
        assert_eq!(
            calls[1],
            "SendMessage http://sqs:9324/000000000000/sqs-queue hello"
        );
    }
}
