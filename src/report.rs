use crate::account::{
    fetch_subscription_info, fetch_usage_analytics, SubscriptionInfo, UsageAnalytics,
};
use crate::api::UsageApi;
use crate::config::Config;
use crate::conversations::fetch_conversation_history;
use crate::error::ReportError;
use crate::history::fetch_speech_history;
use crate::records::{UsageRecord, CONVERSATIONAL_AI, SPEECH_GENERATION};
use crate::summary::{summarize_usage, UsageSummary};
use crate::time::format_timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryInfo {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub start_timestamp_ms: i64,
    pub end_timestamp_ms: i64,
    pub start_time_formatted: String,
    pub end_time_formatted: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub query_info: QueryInfo,
    pub subscription_info: SubscriptionInfo,
    pub summary: UsageSummary,
    pub usage_analytics: UsageAnalytics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_calls: Option<Vec<UsageRecord>>,
}

impl Report {
    pub fn to_json(&self, pretty: bool) -> Result<String, ReportError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Runs every fetcher in turn and assembles the document. Retrieval and
/// generation times are stamped with the run's start instant.
pub async fn build_report<A: UsageApi + ?Sized>(api: &A, config: &Config) -> Report {
    let window = config.window;
    let now = config.run_started_at;

    let subscription_info = fetch_subscription_info(api).await;
    let speech_history = fetch_speech_history(api, &window).await;
    let conversation_history = fetch_conversation_history(api, &window).await;
    let usage_analytics = fetch_usage_analytics(api, &window, now).await;

    let mut calls = speech_history;
    calls.extend(conversation_history);
    calls.sort_by_key(UsageRecord::timestamp);

    assemble_report(config, subscription_info, calls, usage_analytics, now)
}

pub fn assemble_report(
    config: &Config,
    subscription_info: SubscriptionInfo,
    calls: Vec<UsageRecord>,
    usage_analytics: UsageAnalytics,
    generated_at: DateTime<Utc>,
) -> Report {
    let summary = summarize_usage(&calls);
    let window = config.window;

    Report {
        query_info: QueryInfo {
            start_timestamp: config.start_input,
            end_timestamp: config.end_input,
            start_timestamp_ms: window.start_ms,
            end_timestamp_ms: window.end_ms,
            start_time_formatted: format_timestamp(window.start_ms),
            end_time_formatted: format_timestamp(window.end_ms),
            generated_at: format_timestamp(generated_at.timestamp_millis()),
        },
        subscription_info,
        summary,
        usage_analytics,
        individual_calls: (!config.summary_only).then_some(calls),
    }
}

pub fn summary_block(summary: &UsageSummary) -> String {
    format!(
        "Summary:\n   Total API calls: {}\n   Total credits used: {}\n   Speech generations: {}\n   Conversational AI calls: {}",
        summary.total_api_calls,
        summary.total_credits_used,
        summary.count_of(SPEECH_GENERATION),
        summary.count_of(CONVERSATIONAL_AI),
    )
}

/// Writes the rendered report to the timestamped file and, if requested, the
/// user's file. Returns the paths written, in that order.
pub fn write_report(config: &Config, json: &str) -> Result<Vec<PathBuf>, ReportError> {
    let mut paths = vec![config.auto_output_path()];
    if let Some(ref extra) = config.output {
        paths.push(extra.clone());
    }
    for path in &paths {
        write_file(path, json)?;
        info!(path = %path.display(), "Report written");
    }
    Ok(paths)
}

fn write_file(path: &Path, json: &str) -> Result<(), ReportError> {
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
