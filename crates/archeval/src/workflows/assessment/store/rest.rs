use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use super::{newest_first, StoreError, SubmissionRecord, SubmissionStore};
use crate::config::StoreConfig;

/// PostgREST-style table endpoint (`{url}/rest/v1/{table}`).
pub struct RestSubmissionStore {
    client: reqwest::Client,
    table_url: String,
}

impl RestSubmissionStore {
    /// Returns `None` unless both the url and the key are configured.
    pub fn from_config(config: &StoreConfig) -> Result<Option<Self>, StoreError> {
        match (&config.url, &config.api_key) {
            (Some(url), Some(key)) => Self::new(url, key, &config.table).map(Some),
            _ => Ok(None),
        }
    }

    pub fn new(url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::Unavailable("store key is not a valid header".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StoreError::Unavailable("store key is not a valid header".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", url.trim_end_matches('/'), table),
        })
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SubmissionStore for RestSubmissionStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        debug!(submission_id = %record.id, "persisting submission");
        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let response = self
            .client
            .get(format!("{}?select=*&order=created_at.desc", self.table_url))
            .send()
            .await?;
        let mut records: Vec<SubmissionRecord> = ensure_success(response).await?.json().await?;
        newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::answers::{AnswerSet, ApiTolerance};
    use crate::workflows::assessment::engine::evaluate;
    use chrono::Duration as ChronoDuration;

    fn record() -> SubmissionRecord {
        let answers = AnswerSet::builder()
            .api_tolerance(ApiTolerance::RiskMitigation)
            .remaining_gatekeepers(false)
            .remaining_responses(2)
            .build()
            .expect("complete answers");
        let result = evaluate(&answers);
        SubmissionRecord::new(answers, result)
    }

    #[test]
    fn from_config_needs_url_and_key() {
        let config = StoreConfig {
            url: Some("https://db.example.com".to_string()),
            api_key: None,
            table: "submissions".to_string(),
        };
        assert!(RestSubmissionStore::from_config(&config)
            .expect("no error")
            .is_none());
    }

    #[tokio::test]
    async fn save_posts_record_with_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/submissions")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .match_header("prefer", "return=minimal")
            .match_body(mockito::Matcher::Regex("\"decision\":\"SLM\"".to_string()))
            .with_status(201)
            .create_async()
            .await;

        let store = RestSubmissionStore::new(&server.url(), "anon-key", "submissions")
            .expect("store builds");
        store.save(&record()).await.expect("save succeeds");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_all_orders_newest_first() {
        let older = record();
        let mut newer = record();
        newer.created_at = older.created_at + ChronoDuration::minutes(5);
        let body = serde_json::to_string(&vec![older.clone(), newer.clone()]).expect("serialize");

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/submissions")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("select".into(), "*".into()),
                mockito::Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let store = RestSubmissionStore::new(&server.url(), "anon-key", "submissions")
            .expect("store builds");
        let records = store.fetch_all().await.expect("fetch succeeds");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, newer.id);
        assert_eq!(records[1].id, older.id);
    }

    #[tokio::test]
    async fn save_surfaces_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/submissions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let store = RestSubmissionStore::new(&server.url(), "bad", "submissions")
            .expect("store builds");
        match store.save(&record()).await {
            Err(StoreError::Status { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
