use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response of Wiremock's `GET /__admin/requests`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WiremockAdminStatus {
    pub requests: Vec<WiremockAdminRequest>,
    pub meta: WiremockAdminMeta,
    pub request_journal_disabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WiremockAdminMeta {
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WiremockAdminRequest {
    pub id: String,
    pub request: LoggedRequest,
    pub response_definition: ResponseDefinition,
    pub was_matched: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedRequest {
    pub url: String,
    pub absolute_url: String,
    pub method: String,
    pub client_ip: String,
    // Wiremock renders single-valued headers as strings and repeated ones as arrays
    pub headers: HashMap<String, serde_json::Value>,
    pub cookies: HashMap<String, serde_json::Value>,
    pub browser_proxy_request: bool,
    pub logged_date: i64,
    pub body_as_base64: String,
    pub body: String,
    pub logged_date_string: Option<DateTime<Utc>>,
}

impl LoggedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| match value {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Array(values) => values.first().and_then(|v| v.as_str()),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseDefinition {
    pub status: u16,
    pub body: Option<String>,
}

/// One line of the SNS emulator's `/tmp/sns.log`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnsLogEntry {
    #[serde(rename = "MessageId", default)]
    pub message_id: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Type", default)]
    pub r#type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    S,
    N,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub kind: KeyKind,
}

impl KeyAttribute {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: KeyKind::S,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: KeyKind::N,
        }
    }
}

/// DynamoDB table created with on-demand billing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, partition_key: KeyAttribute) -> Self {
        Self {
            name: name.into(),
            partition_key,
            sort_key: None,
        }
    }

    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }
}
