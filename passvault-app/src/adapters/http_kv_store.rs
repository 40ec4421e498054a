//! HTTP key-value store client for the remote `/api/storage` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use passvault_core::error::{CoreError, CoreResult};
use passvault_core::traits::KeyValueStore;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 错误信息中保留的响应体长度
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    keys: Vec<String>,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    key: &'a str,
    value: &'a str,
}

/// `KeyValueStore` backed by the remote storage endpoint.
///
/// - `GET {base}/api/storage?key=` → `{ key, value }`
/// - `POST {base}/api/storage` with `{ key, value }`
/// - `DELETE {base}/api/storage?key=`
/// - `GET {base}/api/storage?action=list&prefix=` → `{ keys }`
pub struct HttpKeyValueStore {
    client: Client,
    endpoint: String,
}

impl HttpKeyValueStore {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::StorageError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/storage", base_url.trim_end_matches('/')),
        })
    }

    /// Storage endpoint url
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}?key={}", self.endpoint, urlencoding::encode(key))
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// Values are never logged; only the method and key.
    async fn execute(request: RequestBuilder, method: &str, key: &str) -> CoreResult<String> {
        log::debug!("[storage] {method} {key}");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::StorageError(format!("{method} {key} timed out"))
            } else {
                CoreError::StorageError(format!("{method} {key} failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let detail: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            log::warn!("[storage] {method} {key} returned HTTP {}", status.as_u16());
            return Err(CoreError::StorageError(format!(
                "HTTP {}: {detail}",
                status.as_u16()
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl KeyValueStore for HttpKeyValueStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let body = Self::execute(self.client.get(self.key_url(key)), "GET", key).await?;

        // A body that is not the expected JSON counts as "no document"
        match serde_json::from_str::<GetResponse>(&body) {
            Ok(response) => Ok(response.value),
            Err(e) => {
                log::warn!("[storage] GET {key} returned an unreadable body: {e}");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let request = self
            .client
            .post(&self.endpoint)
            .json(&SetRequest { key, value });
        Self::execute(request, "POST", key).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CoreResult<()> {
        Self::execute(self.client.delete(self.key_url(key)), "DELETE", key).await?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        let url = format!(
            "{}?action=list&prefix={}",
            self.endpoint,
            urlencoding::encode(prefix)
        );
        let body = Self::execute(self.client.get(url), "LIST", prefix).await?;
        let response: ListResponse = serde_json::from_str(&body)?;
        Ok(response.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let store = HttpKeyValueStore::new("https://vault.example.com/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(store.endpoint(), "https://vault.example.com/api/storage");
    }

    #[test]
    fn key_is_url_encoded() {
        let store =
            HttpKeyValueStore::new("http://localhost:8788", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.key_url("passwords_张 三"),
            "http://localhost:8788/api/storage?key=passwords_%E5%BC%A0%20%E4%B8%89"
        );
    }

    #[test]
    fn get_response_tolerates_null_value() {
        let parsed: GetResponse =
            serde_json::from_str(r#"{"key":"passwords_alice","value":null}"#).unwrap();
        assert_eq!(parsed.value, None);
    }
}
