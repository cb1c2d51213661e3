use crate::domain::model::WiremockAdminStatus;
use crate::utils::error::{HarnessError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn default_client() -> Result<Client> {
    Ok(Client::builder().timeout(DEFAULT_TIMEOUT).build()?)
}

/// POSTs `payload` to a Lambda runtime invocation endpoint and returns the
/// function's response body.
pub async fn invoke_lambda(
    client: &Client,
    url: &str,
    payload: &serde_json::Value,
) -> Result<String> {
    tracing::debug!("Invoking Lambda at {}", url);
    let response = client.post(url).json(payload).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status != reqwest::StatusCode::OK {
        return Err(HarnessError::UnexpectedStatusError {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

pub async fn fetch_admin_status(client: &Client, url: &str) -> Result<WiremockAdminStatus> {
    tracing::debug!("Fetching Wiremock request journal from {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HarnessError::UnexpectedStatusError {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_invoke_lambda_returns_body() {
        let server = MockServer::start();
        let invocation = server.mock(|when, then| {
            when.method(POST)
                .path("/2015-03-31/functions/myfunction/invocations")
                .json_body(serde_json::json!({"path": "/api-gateway-stage"}));
            then.status(200).body("null");
        });

        let client = default_client().unwrap();
        let body = invoke_lambda(
            &client,
            &server.url("/2015-03-31/functions/myfunction/invocations"),
            &serde_json::json!({"path": "/api-gateway-stage"}),
        )
        .await
        .unwrap();

        invocation.assert();
        assert_eq!(body, "null");
    }

    #[tokio::test]
    async fn test_invoke_lambda_non_200_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(502)
                .body(r#"{"errorMessage":"exit status 1"}"#);
        });

        let client = default_client().unwrap();
        let err = invoke_lambda(&client, &server.url("/"), &serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            HarnessError::UnexpectedStatusError { status, body, .. } => {
                assert_eq!(status, 502);
                assert!(body.contains("exit status 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_admin_status() {
        let server = MockServer::start();
        let journal = server.mock(|when, then| {
            when.method(GET).path("/__admin/requests");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "requests": [{
                        "id": "a",
                        "request": {"url": "/", "absoluteUrl": "http://wiremock:8080/", "method": "GET"},
                        "responseDefinition": {"status": 200},
                        "wasMatched": true
                    }],
                    "meta": {"total": 1},
                    "requestJournalDisabled": false
                }));
        });

        let client = default_client().unwrap();
        let status = fetch_admin_status(&client, &server.url("/__admin/requests"))
            .await
            .unwrap();

        journal.assert();
        assert_eq!(status.meta.total, 1);
        assert_eq!(status.requests[0].request.method, "GET");
    }

    #[tokio::test]
    async fn test_fetch_admin_status_invalid_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/__admin/requests");
            then.status(200).body("not json");
        });

        let client = default_client().unwrap();
        let err = fetch_admin_status(&client, &server.url("/__admin/requests"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::SerializationError(_)));
    }
}
