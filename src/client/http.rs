//! Blocking HTTP client for a running Cortex.

use super::{CortexApi, Endpoint, HttpConfig, build_http_client};
use crate::models::{
    Analysis, Answer, BackendConfig, ConfigField, ConfigUpdateReceipt, DeleteReceipt, GraphData,
    MemoryDraft, MemoryId, ReindexReport, ResetReport, SaveReceipt, UpdateReceipt, VaultTree,
};
use crate::{Error, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::time::Instant;

/// Cortex REST client.
pub struct HttpCortexClient {
    /// Base URL every endpoint path is appended to.
    base_url: Url,
    /// HTTP client.
    client: Client,
}

impl HttpCortexClient {
    /// Default base URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Creates a client for the given base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the URL cannot be parsed or cannot
    /// carry a path.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| Error::InvalidInput(format!("invalid base URL '{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            base_url: parsed,
            client: build_http_client(HttpConfig::default()),
        })
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the full URL for an endpoint.
    fn url(&self, endpoint: Endpoint, id: Option<&MemoryId>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidInput(format!("base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for part in endpoint.path(None).split('/').filter(|s| !s.is_empty()) {
                segments.push(part);
            }
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    /// Sends one request and decodes the JSON response.
    fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<&MemoryId>,
        body: Option<&Value>,
    ) -> Result<T> {
        let operation = endpoint.name();
        let url = self.url(endpoint, id)?;
        let method = match endpoint.method() {
            "GET" => reqwest::Method::GET,
            "PUT" => reqwest::Method::PUT,
            "DELETE" => reqwest::Method::DELETE,
            _ => reqwest::Method::POST,
        };

        tracing::debug!(endpoint = operation, %url, "Sending Cortex request");
        let started = Instant::now();

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = request
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    endpoint = operation,
                    error = %e,
                    error_kind = error_kind,
                    is_timeout = e.is_timeout(),
                    is_connect = e.is_connect(),
                    "Cortex request failed"
                );
                Error::Unreachable {
                    operation: operation.to_string(),
                    cause: format!("{error_kind} error: {e}"),
                }
            })
            .and_then(|response| Self::decode(operation, response));

        let outcome = match &result {
            Ok(_) => "success",
            Err(Error::Status { .. }) => "status",
            Err(Error::Decode { .. }) => "decode",
            Err(_) => "unreachable",
        };
        metrics::counter!(
            "engram_api_requests_total",
            "endpoint" => operation,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("engram_api_request_duration_seconds", "endpoint" => operation)
            .record(started.elapsed().as_secs_f64());

        result
    }

    fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::blocking::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                endpoint = operation,
                status = %status,
                body = %body,
                "Cortex returned error status"
            );
            return Err(Error::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(|e| Error::Decode {
            operation: operation.to_string(),
            cause: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(endpoint = operation, error = %e, "Failed to parse Cortex response");
            Error::Decode {
                operation: operation.to_string(),
                cause: format!("{e}. Response: {text}"),
            }
        })
    }
}

impl CortexApi for HttpCortexClient {
    fn save_memory(&self, draft: &MemoryDraft) -> Result<SaveReceipt> {
        let body = serde_json::to_value(draft)
            .map_err(|e| Error::InvalidInput(format!("unserializable memory draft: {e}")))?;
        self.execute(Endpoint::Save, None, Some(&body))
    }

    fn delete_memory(&self, id: &MemoryId) -> Result<DeleteReceipt> {
        self.execute(Endpoint::Delete, Some(id), None)
    }

    fn update_memory(&self, id: &MemoryId, content: &str) -> Result<UpdateReceipt> {
        let body = json!({ "content": content });
        self.execute(Endpoint::Update, Some(id), Some(&body))
    }

    fn reindex(&self) -> Result<ReindexReport> {
        self.execute(Endpoint::Reindex, None, None)
    }

    fn graph(&self) -> Result<GraphData> {
        self.execute(Endpoint::Graph, None, None)
    }

    fn analyze(&self, text: &str, context: Option<&str>) -> Result<Analysis> {
        let mut body = Map::new();
        body.insert("text".to_string(), Value::from(text));
        if let Some(context) = context {
            body.insert("context".to_string(), Value::from(context));
        }
        self.execute(Endpoint::Analyze, None, Some(&Value::Object(body)))
    }

    fn ask(&self, query: &str) -> Result<Answer> {
        let body = json!({ "query": query });
        self.execute(Endpoint::Ask, None, Some(&body))
    }

    fn config(&self) -> Result<BackendConfig> {
        self.execute(Endpoint::GetConfig, None, None)
    }

    fn update_config(&self, field: ConfigField, value: &str) -> Result<ConfigUpdateReceipt> {
        let mut body = Map::new();
        body.insert(field.as_str().to_string(), Value::from(value));
        self.execute(Endpoint::SetConfig, None, Some(&Value::Object(body)))
    }

    fn reset(&self) -> Result<ResetReport> {
        self.execute(Endpoint::Reset, None, None)
    }

    fn vault_tree(&self) -> Result<VaultTree> {
        self.execute(Endpoint::Tree, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("http://localhost:8000", Endpoint::Graph, None, "http://localhost:8000/graph")]
    #[test_case("http://localhost:8000/", Endpoint::Ask, None, "http://localhost:8000/ask")]
    #[test_case("http://host/api", Endpoint::Reset, None, "http://host/api/reset")]
    #[test_case("http://host/api/", Endpoint::Delete, Some("a b"), "http://host/api/delete/a%20b")]
    #[test_case("http://host", Endpoint::Update, Some("x/y"), "http://host/update/x%2Fy")]
    fn test_url_building(base: &str, endpoint: Endpoint, id: Option<&str>, expected: &str) {
        let client = HttpCortexClient::new(base).unwrap();
        let id = id.map(MemoryId::from);
        let url = client.url(endpoint, id.as_ref()).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpCortexClient::new("not a url"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            HttpCortexClient::new("mailto:cortex@example.com"),
            Err(Error::InvalidInput(_))
        ));
    }
}
