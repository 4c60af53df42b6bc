use crate::records::UsageRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub count: u64,
    pub credits: i64,
}

impl Breakdown {
    fn add(&mut self, credits: i64) {
        self.count += 1;
        self.credits += credits;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub earliest_call: Option<String>,
    pub latest_call: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub total_api_calls: usize,
    pub total_credits_used: i64,
    pub breakdown_by_type: BTreeMap<String, Breakdown>,
    pub breakdown_by_source: BTreeMap<String, Breakdown>,
    pub breakdown_by_voice: BTreeMap<String, Breakdown>,
    pub time_range: TimeRange,
}

impl UsageSummary {
    pub fn count_of(&self, kind: &str) -> u64 {
        self.breakdown_by_type
            .get(kind)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

/// Totals and per-type/source/voice breakdowns over the merged call list.
///
/// The time range compares formatted strings; they are zero-padded UTC so
/// lexicographic order is chronological order.
pub fn summarize_usage(records: &[UsageRecord]) -> UsageSummary {
    let mut summary = UsageSummary {
        total_api_calls: records.len(),
        ..UsageSummary::default()
    };

    for record in records {
        let credits = record.credits_used();
        summary.total_credits_used += credits;
        summary
            .breakdown_by_type
            .entry(record.kind().to_string())
            .or_default()
            .add(credits);

        if let UsageRecord::SpeechGeneration(speech) = record {
            if let Some(ref source) = speech.source {
                summary
                    .breakdown_by_source
                    .entry(source.clone())
                    .or_default()
                    .add(credits);
            }
            if let Some(ref voice) = speech.voice_name {
                summary
                    .breakdown_by_voice
                    .entry(voice.clone())
                    .or_default()
                    .add(credits);
            }
        }
    }

    summary.time_range = TimeRange {
        earliest_call: records
            .iter()
            .map(UsageRecord::formatted_time)
            .min()
            .map(str::to_string),
        latest_call: records
            .iter()
            .map(UsageRecord::formatted_time)
            .max()
            .map(str::to_string),
    };
    summary
}
