//! Elasticsearch over HTTP: cosine `knn` search for the dense modality and
//! a `match` query with operator `and` for the lexical modality.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use tributary_core::config::BackendConfig;
use tributary_core::errors::{SearchError, TributaryResult};
use tributary_core::models::{BackendHit, KnnRequest};
use tributary_core::traits::{ILexicalIndex, IVectorIndex};

const BACKEND: &str = "elasticsearch";
const VECTOR_FIELD: &str = "embedding";
const TEXT_FIELD: &str = "content";
const SOURCE_FIELDS: [&str; 4] = ["chunk_id", "document_id", "content", "metadata"];

pub struct ElasticClient {
    client: reqwest::Client,
    search_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: HitsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<EsHit>,
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: EsSource,
}

#[derive(Debug, Default, Deserialize)]
struct EsSource {
    document_id: Option<Value>,
    chunk_id: Option<Value>,
    content: Option<String>,
    metadata: Option<Value>,
}

impl ElasticClient {
    pub fn new(base_url: &str, index: &str, timeout: Duration) -> TributaryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::BackendUnavailable {
                backend: BACKEND.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            search_url: format!("{}/{}/_search", base_url.trim_end_matches('/'), index),
        })
    }

    /// Client for the configured cluster, or `None` when no URL is set.
    pub fn from_config(config: &BackendConfig) -> TributaryResult<Option<Self>> {
        match config.elasticsearch_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(Some(Self::new(
                url,
                &config.elasticsearch_index,
                config.elasticsearch_timeout(),
            )?)),
            _ => Ok(None),
        }
    }

    /// Request body for a cosine KNN query.
    pub fn knn_body(request: &KnnRequest) -> Value {
        json!({
            "size": request.k,
            "knn": {
                "field": VECTOR_FIELD,
                "query_vector": request.vector,
                "k": request.k,
                "num_candidates": request.candidate_pool,
                "similarity": request.metric.as_str(),
            },
            "_source": SOURCE_FIELDS,
        })
    }

    /// Request body for a BM25 term match requiring every term.
    pub fn match_body(query: &str, k: usize) -> Value {
        json!({
            "size": k,
            "query": {
                "match": {
                    (TEXT_FIELD): { "query": query, "operator": "and" }
                }
            },
            "_source": SOURCE_FIELDS,
        })
    }

    /// Extract hits from a `_search` response. Hits without a document id
    /// are dropped; a missing score counts as 0.
    pub fn parse_hits(body: Value) -> TributaryResult<Vec<BackendHit>> {
        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| SearchError::MalformedResponse {
                backend: BACKEND.to_string(),
                reason: e.to_string(),
            })?;

        Ok(response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| {
                let document_id = id_string(hit.source.document_id?)?;
                let metadata = match hit.source.metadata {
                    Some(Value::Object(map)) => map,
                    _ => serde_json::Map::new(),
                };
                Some(BackendHit {
                    document_id,
                    chunk_id: hit.source.chunk_id.and_then(id_string),
                    content: hit.source.content.unwrap_or_default(),
                    metadata,
                    native_score: hit.score.unwrap_or(0.0),
                })
            })
            .collect())
    }

    async fn post(&self, body: &Value) -> TributaryResult<Vec<BackendHit>> {
        let response = self
            .client
            .post(&self.search_url)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::BackendUnavailable {
                backend: BACKEND.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::BadStatus {
                backend: BACKEND.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse {
                backend: BACKEND.to_string(),
                reason: e.to_string(),
            })?;
        Self::parse_hits(json)
    }
}

/// Ids may be stored as strings or numbers; empty strings mean absent.
fn id_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl IVectorIndex for ElasticClient {
    async fn knn(&self, request: KnnRequest) -> TributaryResult<Vec<BackendHit>> {
        self.post(&Self::knn_body(&request)).await
    }
}

#[async_trait]
impl ILexicalIndex for ElasticClient {
    async fn term_match(&self, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        self.post(&Self::match_body(query, k)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_joins_without_double_slash() {
        let client = ElasticClient::new("http://es:9200/", "chunks", Duration::from_secs(1)).unwrap();
        assert_eq!(client.search_url, "http://es:9200/chunks/_search");
    }

    #[test]
    fn knn_body_carries_oversampled_pool() {
        let request = KnnRequest::cosine(vec![0.5, 0.25], 4, 5, 50);
        let body = ElasticClient::knn_body(&request);
        assert_eq!(body["size"], 4);
        assert_eq!(body["knn"]["k"], 4);
        assert_eq!(body["knn"]["num_candidates"], 50);
        assert_eq!(body["knn"]["similarity"], "cosine");
        assert_eq!(body["knn"]["field"], "embedding");
        assert_eq!(body["knn"]["query_vector"], json!([0.5, 0.25]));
    }

    #[test]
    fn match_body_requires_all_terms() {
        let body = ElasticClient::match_body("async runtime", 7);
        assert_eq!(body["size"], 7);
        assert_eq!(body["query"]["match"]["content"]["operator"], "and");
        assert_eq!(body["query"]["match"]["content"]["query"], "async runtime");
    }

    #[test]
    fn parse_hits_reads_sources() {
        let body = json!({
            "hits": { "hits": [
                { "_score": 3.5, "_source": {
                    "document_id": "d1", "chunk_id": "c1", "content": "text",
                    "metadata": { "page": 2 } } },
                { "_score": 1.0, "_source": { "document_id": 42, "chunk_id": "" } },
                { "_score": 0.5, "_source": { "content": "orphan" } }
            ] }
        });
        let hits = ElasticClient::parse_hits(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document_id, "d1");
        assert_eq!(hits[0].chunk_id.as_deref(), Some("c1"));
        assert_eq!(hits[0].metadata["page"], 2);
        assert_eq!(hits[0].native_score, 3.5);
        assert_eq!(hits[1].document_id, "42");
        assert_eq!(hits[1].chunk_id, None);
        assert_eq!(hits[1].content, "");
    }

    #[test]
    fn parse_hits_tolerates_empty_response() {
        assert!(ElasticClient::parse_hits(json!({})).unwrap().is_empty());
    }

    #[test]
    fn parse_hits_rejects_wrong_shape() {
        assert!(ElasticClient::parse_hits(json!({ "hits": { "hits": 3 } })).is_err());
    }

    #[tokio::test]
    async fn unreachable_cluster_is_an_error() {
        let client = ElasticClient::new("http://127.0.0.1:9", "chunks", Duration::from_secs(2)).unwrap();
        assert!(client.term_match("anything", 3).await.is_err());
    }
}
