use crate::config::aws::AwsSettings;
use crate::domain::model::{KeyAttribute, KeyKind, TableDefinition};
use crate::utils::error::{HarnessError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType,
};
use serde::Serialize;
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// The DynamoDB calls the harness makes.
#[async_trait]
pub trait DynamoDbApi: Send + Sync {
    async fn scan(&self, table: &str) -> Result<Vec<Item>>;
    async fn create_table(&self, definition: &TableDefinition) -> Result<()>;
    async fn put_item(&self, table: &str, item: Item) -> Result<()>;
}

#[async_trait]
impl DynamoDbApi for aws_sdk_dynamodb::Client {
    async fn scan(&self, table: &str) -> Result<Vec<Item>> {
        let output = self
            .scan()
            .table_name(table)
            .send()
            .await
            .map_err(|e| HarnessError::aws("dynamodb", "Scan", e))?;
        Ok(output.items.unwrap_or_default())
    }

    async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let mut request = self
            .create_table()
            .table_name(&definition.name)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(attribute_definition(&definition.partition_key)?)
            .key_schema(key_schema_element(&definition.partition_key, KeyType::Hash)?);

        if let Some(sort_key) = &definition.sort_key {
            request = request
                .attribute_definitions(attribute_definition(sort_key)?)
                .key_schema(key_schema_element(sort_key, KeyType::Range)?);
        }

        request
            .send()
            .await
            .map_err(|e| HarnessError::aws("dynamodb", "CreateTable", e))?;
        Ok(())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| HarnessError::aws("dynamodb", "PutItem", e))?;
        Ok(())
    }
}

fn attribute_definition(key: &KeyAttribute) -> Result<AttributeDefinition> {
    let attribute_type = match key.kind {
        KeyKind::S => ScalarAttributeType::S,
        KeyKind::N => ScalarAttributeType::N,
        KeyKind::B => ScalarAttributeType::B,
    };
    AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(attribute_type)
        .build()
        .map_err(|e| HarnessError::aws("dynamodb", "CreateTable", e))
}

fn key_schema_element(key: &KeyAttribute, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()
        .map_err(|e| HarnessError::aws("dynamodb", "CreateTable", e))
}

/// Marshals any serializable value whose JSON form is an object into a
/// DynamoDB item.
pub fn to_item<T: Serialize + ?Sized>(object: &T) -> Result<Item> {
    match serde_json::to_value(object)? {
        serde_json::Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, to_attribute_value(value)))
            .collect()),
        other => Err(HarnessError::InvalidItemError {
            message: format!("items must serialize to a JSON object, got {}", other),
        }),
    }
}

pub fn to_attribute_value(value: serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null(true),
        serde_json::Value::Bool(b) => AttributeValue::Bool(b),
        serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
        serde_json::Value::String(s) => AttributeValue::S(s),
        serde_json::Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(to_attribute_value).collect())
        }
        serde_json::Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, to_attribute_value(value)))
                .collect(),
        ),
    }
}

pub struct DynamoDbClient<C: DynamoDbApi = aws_sdk_dynamodb::Client> {
    handle: C,
}

impl DynamoDbClient {
    pub async fn connect(hostname: &str, port: u16) -> Self {
        let endpoint = format!("http://{}:{}", hostname, port);
        let config = AwsSettings::from_env().sdk_config(&endpoint).await;
        Self::with_handle(aws_sdk_dynamodb::Client::new(&config))
    }
}

impl<C: DynamoDbApi> DynamoDbClient<C> {
    pub fn with_handle(handle: C) -> Self {
        Self { handle }
    }

    pub async fn get_items_in_table(&self, table: &str) -> Result<Vec<Item>> {
        self.handle
            .scan(table)
            .await
            .map_err(|e| e.context("scanning DynamoDB"))
    }

    pub async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        tracing::debug!("Creating DynamoDB table {}", definition.name);
        self.handle.create_table(definition).await
    }

    pub async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.handle.put_item(table, item).await
    }

    pub async fn put_object<T: Serialize + ?Sized>(&self, table: &str, object: &T) -> Result<()> {
        let item = to_item(object)?;
        self.put_item(table, item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockDynamoDbApi {
        fail: bool,
        items: Vec<Item>,
        created: Mutex<Vec<TableDefinition>>,
        put: Mutex<Vec<(String, Item)>>,
    }

    impl MockDynamoDbApi {
        fn failure(operation: &'static str) -> HarnessError {
            HarnessError::AwsError {
                service: "dynamodb",
                operation,
                message: "error".to_string(),
            }
        }
    }

    #[async_trait]
    impl DynamoDbApi for MockDynamoDbApi {
        async fn scan(&self, _table: &str) -> Result<Vec<Item>> {
            if self.fail {
                return Err(Self::failure("Scan"));
            }
            Ok(self.items.clone())
        }

        async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
            if self.fail {
                return Err(Self::failure("CreateTable"));
            }
            self.created.lock().unwrap().push(definition.clone());
            Ok(())
        }

        async fn put_item(&self, table: &str, item: Item) -> Result<()> {
            if self.fail {
                return Err(Self::failure("PutItem"));
            }
            self.put.lock().unwrap().push((table.to_string(), item));
            Ok(())
        }
    }

    fn failing() -> DynamoDbClient<MockDynamoDbApi> {
        DynamoDbClient::with_handle(MockDynamoDbApi {
            fail: true,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_get_items_in_table() {
        let item: Item = HashMap::from([("Key".to_string(), AttributeValue::S("Value".to_string()))]);
        let client = DynamoDbClient::with_handle(MockDynamoDbApi {
            items: vec![item.clone()],
            ..Default::default()
        });

        let items = client.get_items_in_table("testTable").await.unwrap();
        assert_eq!(items, vec![item]);
    }

    #[tokio::test]
    async fn test_get_items_in_table_error() {
        let err = failing().get_items_in_table("testTable").await.unwrap_err();
        assert!(err.to_string().starts_with("scanning DynamoDB"));
    }

    #[tokio::test]
    async fn test_create_table() {
        let client = DynamoDbClient::with_handle(MockDynamoDbApi::default());
        let definition = TableDefinition::new("messages", KeyAttribute::string("Message"))
            .with_sort_key(KeyAttribute::number("Timestamp"));

        client.create_table(&definition).await.unwrap();

        assert_eq!(*client.handle.created.lock().unwrap(), vec![definition]);
        assert!(failing()
            .create_table(&TableDefinition::new("t", KeyAttribute::string("k")))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_put_object() {
        #[derive(Serialize)]
        struct Row {
            #[serde(rename = "Key")]
            key: String,
        }

        let client = DynamoDbClient::with_handle(MockDynamoDbApi::default());
        client
            .put_object("testTable", &Row { key: "Value".to_string() })
            .await
            .unwrap();

        let put = client.handle.put.lock().unwrap();
        assert_eq!(put.len(), 1);
        assert_eq!(put[0].0, "testTable");
        assert_eq!(put[0].1.get("Key"), Some(&AttributeValue::S("Value".to_string())));
    }

    #[tokio::test]
    async fn test_put_object_error() {
        let err = failing()
            .put_object("testTable", &serde_json::json!({"Key": "Value"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::AwsError { operation: "PutItem", .. }));
    }

    #[test]
    fn test_to_item_nested_values() {
        let item = to_item(&serde_json::json!({
            "message": "Hello World!",
            "count": 3,
            "read": false,
            "tags": ["a", 1],
            "meta": {"source": "wiremock"},
            "missing": null
        }))
        .unwrap();

        assert_eq!(item["message"], AttributeValue::S("Hello World!".to_string()));
        assert_eq!(item["count"], AttributeValue::N("3".to_string()));
        assert_eq!(item["read"], AttributeValue::Bool(false));
        assert_eq!(
            item["tags"],
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::N("1".to_string())
            ])
        );
        assert_eq!(
            item["meta"],
            AttributeValue::M(HashMap::from([(
                "source".to_string(),
                AttributeValue::S("wiremock".to_string())
            )]))
        );
        assert_eq!(item["missing"], AttributeValue::Null(true));
    }

    #[test]
    fn test_to_item_rejects_non_objects() {
        let err = to_item(&"just a string").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidItemError { .. }));
        assert_eq!(
            err.recovery_suggestion(),
            "Pass a struct or map that serializes to a JSON object"
        );
        assert!(matches!(
            to_item(&vec![1, 2, 3]),
            Err(HarnessError::InvalidItemError { .. })
        ));
    }
}
