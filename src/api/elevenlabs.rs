use crate::api::{AnalyticsQuery, ConversationQuery, UsageApi};
use crate::error::ReportError;
use crate::models::{ConversationDetail, ConversationPage, HistoryPage, UserInfo};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ReportError> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| ReportError::Client("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("xi-api-key", key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ReportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context(format!("Failed to fetch {}", path))?;

        let status = response.status();
        let text = response.text().await.context("Failed to read response")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "API error for {}: {} - {}",
                path,
                status,
                text.chars().take(200).collect::<String>()
            ));
        }

        serde_json::from_str(&text).context(format!(
            "Failed to parse {} response: {}",
            path,
            text.chars().take(200).collect::<String>()
        ))
    }
}

#[async_trait]
impl UsageApi for ElevenLabsClient {
    async fn list_history(
        &self,
        page_size: u32,
        start_after_history_item_id: Option<&str>,
    ) -> Result<HistoryPage> {
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(id) = start_after_history_item_id {
            query.push(("start_after_history_item_id", id.to_string()));
        }
        self.get_json("/history", &query).await
    }

    async fn list_conversations(&self, query: &ConversationQuery) -> Result<ConversationPage> {
        let mut params = vec![
            ("call_start_after_unix", query.call_start_after_unix.to_string()),
            ("call_start_before_unix", query.call_start_before_unix.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        if let Some(ref cursor) = query.cursor {
            params.push(("cursor", cursor.clone()));
        }
        self.get_json("/convai/conversations", &params).await
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail> {
        let path = format!(
            "/convai/conversations/{}",
            urlencoding::encode(conversation_id)
        );
        self.get_json(&path, &[]).await
    }

    async fn get_usage(&self, query: &AnalyticsQuery) -> Result<Value> {
        let params = [
            ("start_unix", query.start_unix.to_string()),
            ("end_unix", query.end_unix.to_string()),
            ("breakdown_type", query.breakdown_type.to_string()),
            ("aggregation_interval", query.aggregation_interval.to_string()),
            ("metric", query.metric.to_string()),
        ];
        self.get_json("/usage/character-stats", &params).await
    }

    async fn get_user(&self) -> Result<UserInfo> {
        self.get_json("/user", &[]).await
    }
}
