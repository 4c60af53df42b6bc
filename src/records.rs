use serde::Serialize;
use serde_json::Value;

pub const SPEECH_GENERATION: &str = "speech_generation";
pub const CONVERSATIONAL_AI: &str = "conversational_ai";

/// One billable call, as it appears under `individual_calls`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UsageRecord {
    SpeechGeneration(SpeechRecord),
    ConversationalAi(ConversationRecord),
}

impl UsageRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            UsageRecord::SpeechGeneration(_) => SPEECH_GENERATION,
            UsageRecord::ConversationalAi(_) => CONVERSATIONAL_AI,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> &str {
        match self {
            UsageRecord::SpeechGeneration(r) => &r.id,
            UsageRecord::ConversationalAi(r) => &r.id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            UsageRecord::SpeechGeneration(r) => r.timestamp,
            UsageRecord::ConversationalAi(r) => r.timestamp,
        }
    }

    pub fn formatted_time(&self) -> &str {
        match self {
            UsageRecord::SpeechGeneration(r) => &r.formatted_time,
            UsageRecord::ConversationalAi(r) => &r.formatted_time,
        }
    }

    pub fn credits_used(&self) -> i64 {
        match self {
            UsageRecord::SpeechGeneration(r) => r.credits_used,
            UsageRecord::ConversationalAi(r) => r.credits_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRecord {
    pub id: String,
    pub timestamp: i64,
    pub timestamp_ms: i64,
    pub formatted_time: String,
    pub credits_used: i64,
    pub text: Option<String>,
    pub voice_id: Option<String>,
    pub voice_name: Option<String>,
    pub voice_category: Option<String>,
    pub model_id: Option<String>,
    pub content_type: Option<String>,
    pub source: Option<String>,
    pub character_count_from: Option<i64>,
    pub character_count_to: Option<i64>,
    pub request_id: Option<String>,
    pub settings: Option<Value>,
    pub feedback: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationRecord {
    pub id: String,
    pub agent_id: Option<String>,
    pub timestamp: i64,
    pub timestamp_ms: i64,
    pub formatted_time: String,
    pub credits_used: i64,
    pub duration_secs: Option<i64>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub enrichment: Enrichment,
}

/// Detail-level fields, or the reason they are missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Enrichment {
    Detailed(ConversationDetails),
    Degraded { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationDetails {
    pub total_llm_tokens: u64,
    pub accepted_time: Option<i64>,
    pub termination_reason: Option<String>,
    pub main_language: Option<String>,
    pub charging_info: Option<Value>,
    pub phone_call_info: Option<Value>,
    pub error_info: Option<Value>,
    pub transcript_summary: TranscriptSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptSummary {
    pub total_items: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
}
