//! Scripted in-memory `UsageApi` for exercising the fetchers without a network.

use crate::api::{AnalyticsQuery, ConversationQuery, UsageApi};
use crate::models::{ConversationDetail, ConversationPage, HistoryPage, UserInfo};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// `Err(message)` entries make the matching call fail.
#[derive(Default)]
pub struct FakeApi {
    history_pages: Mutex<VecDeque<Result<HistoryPage, String>>>,
    conversation_pages: Mutex<VecDeque<Result<ConversationPage, String>>>,
    details: HashMap<String, Result<ConversationDetail, String>>,
    usage: Option<Result<Value, String>>,
    user: Option<Result<UserInfo, String>>,
    pub history_cursors: Mutex<Vec<Option<String>>>,
    pub history_page_sizes: Mutex<Vec<u32>>,
    pub conversation_queries: Mutex<Vec<ConversationQuery>>,
    pub usage_queries: Mutex<Vec<AnalyticsQuery>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_page(self, page: Value) -> Self {
        let page = serde_json::from_value(page).expect("history page fixture");
        self.history_pages.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_history_failure(self, message: &str) -> Self {
        self.history_pages
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_conversation_page(self, page: Value) -> Self {
        let page = serde_json::from_value(page).expect("conversation page fixture");
        self.conversation_pages.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_conversation_failure(self, message: &str) -> Self {
        self.conversation_pages
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_detail(mut self, conversation_id: &str, detail: Value) -> Self {
        let detail = serde_json::from_value(detail).expect("conversation detail fixture");
        self.details.insert(conversation_id.to_string(), Ok(detail));
        self
    }

    pub fn with_detail_failure(mut self, conversation_id: &str, message: &str) -> Self {
        self.details
            .insert(conversation_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_usage(mut self, usage: Result<Value, String>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_user(mut self, user: Result<Value, String>) -> Self {
        self.user = Some(user.map(|v| serde_json::from_value(v).expect("user fixture")));
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl UsageApi for FakeApi {
    async fn list_history(
        &self,
        page_size: u32,
        start_after_history_item_id: Option<&str>,
    ) -> Result<HistoryPage> {
        self.history_page_sizes.lock().unwrap().push(page_size);
        self.history_cursors
            .lock()
            .unwrap()
            .push(start_after_history_item_id.map(str::to_string));
        match self.history_pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(HistoryPage::default()),
        }
    }

    async fn list_conversations(&self, query: &ConversationQuery) -> Result<ConversationPage> {
        self.conversation_queries.lock().unwrap().push(query.clone());
        match self.conversation_pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(ConversationPage::default()),
        }
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail> {
        match self.details.get(conversation_id) {
            Some(Ok(detail)) => Ok(detail.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("conversation {} not found", conversation_id)),
        }
    }

    async fn get_usage(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.usage_queries.lock().unwrap().push(query.clone());
        match &self.usage {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("usage analytics not scripted")),
        }
    }

    async fn get_user(&self) -> Result<UserInfo> {
        match &self.user {
            Some(Ok(user)) => Ok(user.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("user not scripted")),
        }
    }
}
