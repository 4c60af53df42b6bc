use crate::api::{ConversationQuery, UsageApi};
use crate::models::{ConversationDetail, ConversationSummary};
use crate::records::{
    ConversationDetails, ConversationRecord, Enrichment, TranscriptSummary, UsageRecord,
};
use crate::time::{format_timestamp, TimeWindow};
use anyhow::Result;
use tracing::{info, warn};

pub const CONVERSATION_PAGE_SIZE: u32 = 100;

/// Lists conversations in the window by cursor and enriches each one with its
/// detail record. Returns an empty list if the listing itself fails, since
/// accounts without conversational AI answer these calls with errors.
pub async fn fetch_conversation_history<A: UsageApi + ?Sized>(
    api: &A,
    window: &TimeWindow,
) -> Vec<UsageRecord> {
    info!("Fetching conversational AI history");

    match scan_conversations(api, window).await {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Could not fetch conversational AI data (might not be available): {:#}",
                e
            );
            Vec::new()
        }
    }
}

async fn scan_conversations<A: UsageApi + ?Sized>(
    api: &A,
    window: &TimeWindow,
) -> Result<Vec<UsageRecord>> {
    let mut records = Vec::new();
    let mut query = ConversationQuery {
        cursor: None,
        call_start_after_unix: window.start_secs(),
        call_start_before_unix: window.end_secs(),
        page_size: CONVERSATION_PAGE_SIZE,
    };

    loop {
        let page = api.list_conversations(&query).await?;
        if page.conversations.is_empty() {
            break;
        }

        for conversation in page.conversations {
            let record = match api.get_conversation(&conversation.conversation_id).await {
                Ok(detail) => enriched_record(conversation, detail),
                Err(e) => {
                    warn!(
                        "Could not get details for conversation {}: {:#}",
                        conversation.conversation_id, e
                    );
                    degraded_record(conversation, format!("Could not fetch detailed data: {:#}", e))
                }
            };
            records.push(record);
        }

        match page.next_cursor.filter(|cursor| !cursor.is_empty()) {
            None => break,
            Some(cursor) if query.cursor.as_deref() == Some(cursor.as_str()) => {
                warn!(%cursor, "Conversation listing returned the cursor it was sent; stopping");
                break;
            }
            Some(cursor) => query.cursor = Some(cursor),
        }
        info!("Fetched {} conversations so far", records.len());
    }

    Ok(records)
}

fn enriched_record(conversation: ConversationSummary, detail: ConversationDetail) -> UsageRecord {
    let metadata = detail.metadata;
    let timestamp = metadata
        .start_time_unix_secs
        .or(conversation.start_time_unix_secs)
        .unwrap_or(0);
    let timestamp_ms = timestamp.saturating_mul(1000);

    let total_llm_tokens: u64 = detail
        .transcript
        .iter()
        .filter_map(|entry| entry.llm_usage.as_ref()?.total_tokens)
        .sum();
    let count_role = |role: &str| {
        detail
            .transcript
            .iter()
            .filter(|entry| entry.role.as_deref() == Some(role))
            .count()
    };
    let transcript_summary = TranscriptSummary {
        total_items: detail.transcript.len(),
        user_messages: count_role("user"),
        assistant_messages: count_role("assistant"),
    };

    UsageRecord::ConversationalAi(ConversationRecord {
        id: conversation.conversation_id,
        agent_id: conversation.agent_id,
        timestamp,
        timestamp_ms,
        formatted_time: format_timestamp(timestamp_ms),
        credits_used: metadata.cost.unwrap_or(0),
        duration_secs: metadata
            .call_duration_secs
            .or(conversation.call_duration_secs),
        status: conversation.status,
        enrichment: Enrichment::Detailed(ConversationDetails {
            total_llm_tokens,
            accepted_time: metadata.accepted_time_unix_secs,
            termination_reason: metadata.termination_reason,
            main_language: metadata.main_language,
            charging_info: metadata.charging,
            phone_call_info: metadata.phone_call,
            error_info: metadata.error,
            transcript_summary,
        }),
    })
}

fn degraded_record(conversation: ConversationSummary, error: String) -> UsageRecord {
    let timestamp = conversation.start_time_unix_secs.unwrap_or(0);
    let timestamp_ms = timestamp.saturating_mul(1000);
    UsageRecord::ConversationalAi(ConversationRecord {
        id: conversation.conversation_id,
        agent_id: conversation.agent_id,
        timestamp,
        timestamp_ms,
        formatted_time: format_timestamp(timestamp_ms),
        credits_used: 0,
        duration_secs: conversation.call_duration_secs,
        status: conversation.status,
        enrichment: Enrichment::Degraded { error },
    })
}
