pub mod elevenlabs;
#[cfg(test)]
pub mod fake;

use crate::models::{ConversationDetail, ConversationPage, HistoryPage, UserInfo};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationQuery {
    pub cursor: Option<String>,
    pub call_start_after_unix: i64,
    pub call_start_before_unix: i64,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub start_unix: i64,
    pub end_unix: i64,
    pub breakdown_type: &'static str,
    pub aggregation_interval: &'static str,
    pub metric: &'static str,
}

/// Read-only view of the remote account used by the report pipeline.
#[async_trait]
pub trait UsageApi: Send + Sync {
    async fn list_history(
        &self,
        page_size: u32,
        start_after_history_item_id: Option<&str>,
    ) -> Result<HistoryPage>;

    async fn list_conversations(&self, query: &ConversationQuery) -> Result<ConversationPage>;

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail>;

    async fn get_usage(&self, query: &AnalyticsQuery) -> Result<Value>;

    async fn get_user(&self) -> Result<UserInfo>;
}
