use crate::api::UsageApi;
use crate::models::HistoryItem;
use crate::records::{SpeechRecord, UsageRecord};
use crate::time::{format_timestamp, TimeWindow};
use tracing::{error, info, warn};

/// Largest page the history endpoint serves.
pub const HISTORY_PAGE_SIZE: u32 = 1000;

/// Walks speech history newest-first by `start_after_history_item_id`.
///
/// The first item older than the window ends the walk, as long as every item
/// seen so far has been in newest-first order. An out-of-order item disarms
/// that early stop and the remaining pages are scanned in full. A failed page
/// ends the walk with whatever was collected before it, as does a page that
/// claims more results without handing out a new cursor.
pub async fn fetch_speech_history<A: UsageApi + ?Sized>(
    api: &A,
    window: &TimeWindow,
) -> Vec<UsageRecord> {
    info!("Fetching speech generation history");

    let mut records = Vec::new();
    let mut start_after_id: Option<String> = None;
    let mut previous_ms: Option<i64> = None;
    let mut early_stop = true;

    loop {
        let page = match api
            .list_history(HISTORY_PAGE_SIZE, start_after_id.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching speech history: {:#}", e);
                break;
            }
        };

        if page.history.is_empty() {
            break;
        }

        for item in page.history {
            let Some(date_unix) = item.date_unix else {
                warn!(id = %item.history_item_id, "History item has no date, skipping");
                continue;
            };
            let item_time_ms = date_unix.saturating_mul(1000);

            if early_stop && previous_ms.is_some_and(|prev| item_time_ms > prev) {
                warn!(
                    id = %item.history_item_id,
                    "History is not newest-first; scanning all pages instead of stopping early"
                );
                early_stop = false;
            }
            previous_ms = Some(item_time_ms);

            if window.contains(item_time_ms) {
                records.push(speech_record(item, date_unix, item_time_ms));
            } else if early_stop && item_time_ms < window.start_ms {
                return records;
            }
        }

        if !page.has_more {
            break;
        }
        match page.last_history_item_id.filter(|id| !id.is_empty()) {
            Some(id) if start_after_id.as_deref() != Some(id.as_str()) => {
                start_after_id = Some(id);
            }
            cursor => {
                warn!(
                    cursor = ?cursor,
                    "History reports more pages without a new cursor; stopping"
                );
                break;
            }
        }
        info!("Fetched {} speech generations so far", records.len());
    }

    records
}

fn speech_record(item: HistoryItem, date_unix: i64, item_time_ms: i64) -> UsageRecord {
    let credits_used = item.credits_used();
    UsageRecord::SpeechGeneration(SpeechRecord {
        id: item.history_item_id,
        timestamp: date_unix,
        timestamp_ms: item_time_ms,
        formatted_time: format_timestamp(item_time_ms),
        credits_used,
        text: item.text,
        voice_id: item.voice_id,
        voice_name: item.voice_name.filter(|name| !name.is_empty()),
        voice_category: item.voice_category,
        model_id: item.model_id,
        content_type: item.content_type,
        source: item.source.filter(|source| !source.is_empty()),
        character_count_from: item.character_count_change_from,
        character_count_to: item.character_count_change_to,
        request_id: item.request_id,
        settings: item.settings,
        feedback: item.feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use serde_json::{json, Value};

    const START: i64 = 1_700_000_000;
    const END: i64 = 1_700_086_400;

    fn window() -> TimeWindow {
        TimeWindow::from_inputs(START, END).unwrap()
    }

    fn item(id: &str, date_unix: i64) -> Value {
        json!({
            "history_item_id": id,
            "date_unix": date_unix,
            "voice_name": "Rachel",
            "source": "api",
            "character_count_change_from": 1000,
            "character_count_change_to": 990
        })
    }

    fn ids(records: &[UsageRecord]) -> Vec<&str> {
        records.iter().map(UsageRecord::id).collect()
    }

    #[tokio::test]
    async fn stops_at_first_item_older_than_window() {
        let api = FakeApi::new()
            .with_history_page(json!({
                "history": [
                    item("newer", END + 10),
                    item("h3", END - 10),
                    item("h2", START + 10),
                    item("old", START - 1),
                    item("h1", START + 5)
                ],
                "last_history_item_id": "h1",
                "has_more": true
            }))
            .with_history_page(json!({
                "history": [item("h0", START + 1)],
                "has_more": false
            }));

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h3", "h2"]);
        assert_eq!(api.history_calls(), 1);
    }

    #[tokio::test]
    async fn follows_last_item_id_across_pages() {
        let api = FakeApi::new()
            .with_history_page(json!({
                "history": [item("h3", END), item("h2", END - 100)],
                "last_history_item_id": "h2",
                "has_more": true
            }))
            .with_history_page(json!({
                "history": [item("h1", START)],
                "last_history_item_id": "h1",
                "has_more": false
            }));

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h3", "h2", "h1"]);
        assert_eq!(
            *api.history_cursors.lock().unwrap(),
            vec![None, Some("h2".to_string())]
        );
        assert_eq!(
            *api.history_page_sizes.lock().unwrap(),
            vec![HISTORY_PAGE_SIZE, HISTORY_PAGE_SIZE]
        );
        assert_eq!(HISTORY_PAGE_SIZE, 1000);
    }

    #[tokio::test]
    async fn builds_speech_records_with_credit_delta() {
        let api = FakeApi::new().with_history_page(json!({
            "history": [
                item("h1", START + 60),
                {"history_item_id": "h0", "date_unix": START + 30, "text": "héllo"}
            ],
            "has_more": false
        }));

        let records = fetch_speech_history(&api, &window()).await;

        let UsageRecord::SpeechGeneration(first) = &records[0] else {
            panic!("expected speech record");
        };
        assert_eq!(first.credits_used, 10);
        assert_eq!(first.timestamp, START + 60);
        assert_eq!(first.timestamp_ms, (START + 60) * 1000);
        assert_eq!(first.formatted_time, "2023-11-14 22:14:20 UTC");
        assert_eq!(first.voice_name.as_deref(), Some("Rachel"));
        assert_eq!(records[1].credits_used(), 0);
    }

    #[tokio::test]
    async fn page_failure_keeps_earlier_results() {
        let api = FakeApi::new()
            .with_history_page(json!({
                "history": [item("h2", END - 5)],
                "last_history_item_id": "h2",
                "has_more": true
            }))
            .with_history_failure("connection reset");

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h2"]);
        assert_eq!(api.history_calls(), 2);
    }

    #[tokio::test]
    async fn out_of_order_history_disables_early_stop() {
        let api = FakeApi::new()
            .with_history_page(json!({
                "history": [item("h2", START + 10), item("h3", START + 20)],
                "last_history_item_id": "h3",
                "has_more": true
            }))
            .with_history_page(json!({
                "history": [item("old", START - 50), item("h1", START + 5)],
                "has_more": false
            }));

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h2", "h3", "h1"]);
        assert_eq!(api.history_calls(), 2);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let api = FakeApi::new().with_history_page(json!({"history": [], "has_more": true}));
        assert!(fetch_speech_history(&api, &window()).await.is_empty());
        assert_eq!(api.history_calls(), 1);
    }

    #[tokio::test]
    async fn more_pages_without_cursor_ends_walk() {
        let api = FakeApi::new()
            .with_history_page(json!({
                "history": [item("h2", END - 5)],
                "has_more": true
            }))
            .with_history_page(json!({
                "history": [item("h2", END - 5)],
                "has_more": true
            }));

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h2"]);
        assert_eq!(api.history_calls(), 1);
    }

    #[tokio::test]
    async fn repeated_cursor_ends_walk() {
        let page = json!({
            "history": [item("h2", END - 5)],
            "last_history_item_id": "h2",
            "has_more": true
        });
        let api = FakeApi::new()
            .with_history_page(page.clone())
            .with_history_page(page.clone())
            .with_history_page(page);

        let records = fetch_speech_history(&api, &window()).await;

        assert_eq!(ids(&records), vec!["h2", "h2"]);
        assert_eq!(
            *api.history_cursors.lock().unwrap(),
            vec![None, Some("h2".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_source_and_voice_are_left_unset() {
        let api = FakeApi::new().with_history_page(json!({
            "history": [
                {"history_item_id": "h2", "date_unix": START + 20, "source": "", "voice_name": ""},
                item("h1", START + 10)
            ],
            "has_more": false
        }));

        let records = fetch_speech_history(&api, &window()).await;

        let UsageRecord::SpeechGeneration(blank) = &records[0] else {
            panic!("expected speech record");
        };
        assert_eq!(blank.source, None);
        assert_eq!(blank.voice_name, None);

        let summary = crate::summary::summarize_usage(&records);
        assert_eq!(
            summary.breakdown_by_source.keys().collect::<Vec<_>>(),
            vec!["api"]
        );
        assert_eq!(
            summary.breakdown_by_voice.keys().collect::<Vec<_>>(),
            vec!["Rachel"]
        );
    }

    #[tokio::test]
    async fn undated_items_are_skipped() {
        let api = FakeApi::new().with_history_page(json!({
            "history": [{"history_item_id": "nodate"}, item("h1", START + 1)],
            "has_more": false
        }));
        let records = fetch_speech_history(&api, &window()).await;
        assert_eq!(ids(&records), vec!["h1"]);
    }
}
