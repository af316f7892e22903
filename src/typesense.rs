//! Typesense HTTP client.
//!
//! Talks to a single Typesense node over its REST API using `reqwest`:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | list collections | `GET /collections` |
//! | create collection | `POST /collections` |
//! | import documents | `POST /collections/{name}/documents/import?action=upsert` |
//!
//! Every request carries the `X-TYPESENSE-API-KEY` header. The configured
//! connection timeout bounds connecting and each socket read, not the whole
//! request: a large import may take as long as the server keeps responding.
//! Imports are sent as JSON Lines and the response is JSON Lines too, one
//! `{"success": ...}` object per document.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::TypesenseConfig;
use crate::traits::SearchIndex;

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Errors returned by [`TypesenseClient`].
#[derive(Debug, Error)]
pub enum TypesenseError {
    /// The request could not be sent or the response not read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Typesense returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not what the API documents.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A document could not be encoded for import.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Per-document outcome of an import.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImportResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CollectionSummary {
    name: String,
}

pub struct TypesenseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TypesenseClient {
    /// Build a client from configuration. Fails if the host or API key is missing.
    pub fn from_config(config: &TypesenseConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let api_key = config.api_key()?.to_string();
        let timeout = Duration::from_secs(config.connection_timeout_secs);
        Ok(Self::new(base_url, api_key, timeout)?)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TypesenseError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn collection_names(&self) -> Result<Vec<String>, TypesenseError> {
        let resp = self
            .http
            .get(format!("{}/collections", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let body = check_status(resp).await?;

        let collections: Vec<CollectionSummary> = serde_json::from_str(&body)
            .map_err(|e| TypesenseError::Decode(format!("collection list: {}", e)))?;
        Ok(collections.into_iter().map(|c| c.name).collect())
    }

    pub async fn create(&self, schema: &Value) -> Result<(), TypesenseError> {
        let resp = self
            .http
            .post(format!("{}/collections", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(schema)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn import(
        &self,
        collection: &str,
        documents: &[Value],
    ) -> Result<Vec<ImportResult>, TypesenseError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let body = to_jsonl(documents)?;
        debug!(collection, documents = documents.len(), bytes = body.len(), "importing batch");

        let resp = self
            .http
            .post(format!(
                "{}/collections/{}/documents/import",
                self.base_url, collection
            ))
            .query(&[("action", "upsert")])
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        let text = check_status(resp).await?;

        parse_import_response(&text)
    }
}

#[async_trait]
impl SearchIndex for TypesenseClient {
    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.collection_names().await?)
    }

    async fn create_collection(&self, schema: &Value) -> Result<()> {
        Ok(self.create(schema).await?)
    }

    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Value],
    ) -> Result<Vec<ImportResult>> {
        Ok(self.import(collection, documents).await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<String, TypesenseError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(TypesenseError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Encode documents as JSON Lines.
pub fn to_jsonl(documents: &[Value]) -> Result<String, TypesenseError> {
    let mut out = String::new();
    for (i, doc) in documents.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&serde_json::to_string(doc)?);
    }
    Ok(out)
}

/// Decode a JSON Lines import response.
///
/// A line that cannot be decoded counts as a failed document rather than
/// failing the batch.
pub fn parse_import_response(body: &str) -> Result<Vec<ImportResult>, TypesenseError> {
    Ok(body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<ImportResult>(line)
                .unwrap_or_else(|e| ImportResult::failed(format!("undecodable result: {}", e)))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jsonl_has_one_document_per_line() {
        let body = to_jsonl(&[json!({"id": "1"}), json!({"id": "2", "n": [1, 2]})]).unwrap();
        assert_eq!(body, "{\"id\":\"1\"}\n{\"id\":\"2\",\"n\":[1,2]}");
    }

    #[test]
    fn import_response_mixed_results() {
        let body = concat!(
            "{\"success\":true}\n",
            "{\"success\":false,\"error\":\"Bad JSON.\",\"document\":\"{\"}\n",
            "\n",
            "{\"success\":true}\n",
        );
        let results = parse_import_response(body).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.success).count(), 2);
        assert_eq!(results[1].error.as_deref(), Some("Bad JSON."));
    }

    #[test]
    fn garbage_line_counts_as_failure() {
        let results = parse_import_response("{\"success\":true}\nnot json").unwrap();
        assert_eq!(results.len(), 2);
        assert!(!results[1].success);
    }

    #[test]
    fn base_url_is_normalized() {
        let client =
            TypesenseClient::new("http://localhost:8108/", "key", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8108");
    }
}
