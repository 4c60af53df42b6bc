use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub last_history_item_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryItem {
    pub history_item_id: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub date_unix: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub voice_name: Option<String>,
    #[serde(default)]
    pub voice_category: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub character_count_change_from: Option<i64>,
    #[serde(default)]
    pub character_count_change_to: Option<i64>,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default)]
    pub feedback: Option<Value>,
}

impl HistoryItem {
    pub fn credits_used(&self) -> i64 {
        match (self.character_count_change_from, self.character_count_change_to) {
            (Some(from), Some(to)) => from - to,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationPage {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
    #[serde(default, alias = "cursor")]
    pub next_cursor: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub call_duration_secs: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationDetail {
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default)]
    pub metadata: ConversationMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub llm_usage: Option<LlmUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmUsage {
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationMetadata {
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub call_duration_secs: Option<i64>,
    #[serde(default)]
    pub cost: Option<i64>,
    #[serde(default)]
    pub accepted_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub termination_reason: Option<String>,
    #[serde(default)]
    pub main_language: Option<String>,
    #[serde(default)]
    pub charging: Option<Value>,
    #[serde(default)]
    pub phone_call: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default)]
    pub subscription_extras: Option<SubscriptionExtras>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub character_count: Option<i64>,
    #[serde(default)]
    pub character_limit: Option<i64>,
    #[serde(default)]
    pub next_character_count_reset_unix: Option<i64>,
    #[serde(default)]
    pub voice_slots_used: Option<i64>,
    #[serde(default)]
    pub voice_limit: Option<i64>,
    #[serde(default)]
    pub professional_voice_slots_used: Option<i64>,
    #[serde(default)]
    pub professional_voice_limit: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionExtras {
    #[serde(default)]
    pub usage: Option<ExtrasUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtrasUsage {
    #[serde(default)]
    pub rollover_credits_used: Option<i64>,
    #[serde(default)]
    pub rollover_credits_quota: Option<i64>,
    #[serde(default)]
    pub subscription_cycle_credits_used: Option<i64>,
    #[serde(default)]
    pub subscription_cycle_credits_quota: Option<i64>,
    #[serde(default)]
    pub manually_gifted_credits_used: Option<i64>,
    #[serde(default)]
    pub manually_gifted_credits_quota: Option<i64>,
    #[serde(default)]
    pub paid_usage_based_credits_used: Option<i64>,
    #[serde(default)]
    pub actual_reported_credits: Option<i64>,
}
