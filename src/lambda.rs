use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lambda_testnet::adapters::clients::dynamodb::to_item;
use lambda_testnet::config::lambda::LambdaConfig;
use lambda_testnet::utils::error::HarnessError;
use lambda_testnet::utils::logger;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    message: String,
}

async fn get_message_from_endpoint(endpoint: &str) -> Result<Message, Error> {
    let response = reqwest::get(endpoint).await?;
    if response.status() != reqwest::StatusCode::OK {
        return Err(Error::from(format!(
            "expected status 200, got status {}",
            response.status()
        )));
    }

    let message: Message = response.json().await?;
    tracing::info!("Wiremock returned a message of {}", message.message);
    Ok(message)
}

async fn send_to_sqs_queue(config: &LambdaConfig, body: &str) -> Result<(), Error> {
    let Some((endpoint, queue)) = config.sqs_target() else {
        tracing::info!("SQS_QUEUE_NAME not set, skipping SQS");
        return Ok(());
    };

    let client = aws_sdk_sqs::Client::new(&config.aws.sdk_config(endpoint).await);
    let queue_url = client
        .get_queue_url()
        .queue_name(queue)
        .send()
        .await
        .map_err(|e| HarnessError::aws("sqs", "GetQueueUrl", e))?;

    client
        .send_message()
        .set_queue_url(queue_url.queue_url().map(str::to_string))
        .message_body(body)
        .send()
        .await
        .map_err(|e| HarnessError::aws("sqs", "SendMessage", e))?;

    tracing::info!("Sent message to SQS queue {}", queue);
    Ok(())
}

async fn send_to_sns_topic(config: &LambdaConfig, body: &str) -> Result<(), Error> {
    let Some((endpoint, topic_arn)) = config.sns_target() else {
        tracing::info!("SNS_TOPIC_ARN not set, skipping SNS");
        return Ok(());
    };

    let client = aws_sdk_sns::Client::new(&config.aws.sdk_config(endpoint).await);
    client
        .publish()
        .topic_arn(topic_arn)
        .message(body)
        .send()
        .await
        .map_err(|e| HarnessError::aws("sns", "Publish", e))?;

    tracing::info!("Published message to SNS topic {}", topic_arn);
    Ok(())
}

async fn write_to_dynamodb_table(config: &LambdaConfig, message: &str) -> Result<(), Error> {
    let Some((endpoint, table)) = config.dynamodb_target() else {
        tracing::info!("DYNAMODB_TABLE_NAME not set, skipping DynamoDB");
        return Ok(());
    };

    let client = aws_sdk_dynamodb::Client::new(&config.aws.sdk_config(endpoint).await);
    client
        .put_item()
        .table_name(table)
        .set_item(Some(to_item(&serde_json::json!({ "Message": message }))?))
        .send()
        .await
        .map_err(|e| HarnessError::aws("dynamodb", "PutItem", e))?;

    tracing::info!("Wrote message to DynamoDB table {}", table);
    Ok(())
}

async fn get_db_url(config: &LambdaConfig, endpoint: &str) -> Result<String, Error> {
    let client = aws_sdk_ssm::Client::new(&config.aws.sdk_config(endpoint).await);
    let response = client
        .get_parameter()
        .name(&config.db_url_parameter)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| HarnessError::aws("ssm", "GetParameter", e))?;

    response
        .parameter()
        .and_then(|p| p.value())
        .map(str::to_string)
        .ok_or_else(|| Error::from(format!("SSM parameter {} has no value", config.db_url_parameter)))
}

async fn write_to_database(config: &LambdaConfig, message: &Message) -> Result<(), Error> {
    let Some(endpoint) = config.ssm_endpoint.as_deref() else {
        tracing::info!("SSM_ENDPOINT not set, skipping database");
        return Ok(());
    };

    let db_url = get_db_url(config, endpoint).await?;
    let statement = "insert into database.messages(message) values($1)";
    tracing::info!("Writing to database using statement: {}", statement);

    let pool = sqlx::PgPool::connect(&db_url).await?;
    sqlx::query(statement)
        .bind(&message.message)
        .execute(&pool)
        .await?;
    pool.close().await;
    Ok(())
}

async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    tracing::info!("Handling invocation {}", event.context.request_id);

    let config = LambdaConfig::from_env()?;
    let api_endpoint = config.api_endpoint.as_deref().unwrap_or_default();

    let message = get_message_from_endpoint(api_endpoint).await?;
    let body = serde_json::to_string(&message)?;

    send_to_sqs_queue(&config, &body).await?;
    send_to_sns_topic(&config, &body).await?;
    write_to_dynamodb_table(&config, &body).await?;
    write_to_database(&config, &message).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
