use crate::api::{AnalyticsQuery, UsageApi};
use crate::models::{ExtrasUsage, UserInfo};
use crate::time::{format_timestamp, TimeWindow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Aggregate analytics, or the reason they could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UsageAnalytics {
    Fetched {
        usage_analytics: Value,
        fetched_at: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubscriptionInfo {
    Fetched(SubscriptionSnapshot),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSnapshot {
    pub tier: Option<String>,
    pub character_count_used: Option<i64>,
    pub character_limit: Option<i64>,
    pub next_reset_unix: Option<i64>,
    pub next_reset_formatted: Option<String>,
    pub voice_slots_used: Option<i64>,
    pub voice_limit: Option<i64>,
    pub professional_voice_slots_used: Option<i64>,
    pub professional_voice_limit: Option<i64>,
    pub status: Option<String>,
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_usage: Option<DetailedUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedUsage {
    pub rollover_credits_used: Option<i64>,
    pub rollover_credits_quota: Option<i64>,
    pub subscription_cycle_credits_used: Option<i64>,
    pub subscription_cycle_credits_quota: Option<i64>,
    pub manually_gifted_credits_used: Option<i64>,
    pub manually_gifted_credits_quota: Option<i64>,
    pub paid_usage_based_credits_used: Option<i64>,
    pub actual_reported_credits: Option<i64>,
}

impl From<ExtrasUsage> for DetailedUsage {
    fn from(usage: ExtrasUsage) -> Self {
        Self {
            rollover_credits_used: usage.rollover_credits_used,
            rollover_credits_quota: usage.rollover_credits_quota,
            subscription_cycle_credits_used: usage.subscription_cycle_credits_used,
            subscription_cycle_credits_quota: usage.subscription_cycle_credits_quota,
            manually_gifted_credits_used: usage.manually_gifted_credits_used,
            manually_gifted_credits_quota: usage.manually_gifted_credits_quota,
            paid_usage_based_credits_used: usage.paid_usage_based_credits_used,
            actual_reported_credits: usage.actual_reported_credits,
        }
    }
}

impl From<UserInfo> for SubscriptionSnapshot {
    fn from(user: UserInfo) -> Self {
        let subscription = user.subscription;
        Self {
            tier: subscription.tier,
            character_count_used: subscription.character_count,
            character_limit: subscription.character_limit,
            next_reset_unix: subscription.next_character_count_reset_unix,
            next_reset_formatted: subscription
                .next_character_count_reset_unix
                .map(|secs| format_timestamp(secs.saturating_mul(1000))),
            voice_slots_used: subscription.voice_slots_used,
            voice_limit: subscription.voice_limit,
            professional_voice_slots_used: subscription.professional_voice_slots_used,
            professional_voice_limit: subscription.professional_voice_limit,
            status: subscription.status,
            currency: subscription.currency,
            detailed_usage: user
                .subscription_extras
                .and_then(|extras| extras.usage)
                .map(DetailedUsage::from),
        }
    }
}

/// Day-by-day credit usage broken down by voice.
pub async fn fetch_usage_analytics<A: UsageApi + ?Sized>(
    api: &A,
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> UsageAnalytics {
    info!("Fetching usage analytics");

    let query = AnalyticsQuery {
        start_unix: window.start_secs(),
        end_unix: window.end_secs(),
        breakdown_type: "voice",
        aggregation_interval: "day",
        metric: "credits",
    };
    match api.get_usage(&query).await {
        Ok(usage_analytics) => UsageAnalytics::Fetched {
            usage_analytics,
            fetched_at: format_timestamp(now.timestamp_millis()),
        },
        Err(e) => {
            warn!("Could not fetch usage analytics: {:#}", e);
            UsageAnalytics::Failed {
                error: format!("{:#}", e),
            }
        }
    }
}

pub async fn fetch_subscription_info<A: UsageApi + ?Sized>(api: &A) -> SubscriptionInfo {
    info!("Fetching subscription information");

    match api.get_user().await {
        Ok(user) => SubscriptionInfo::Fetched(user.into()),
        Err(e) => {
            warn!("Could not fetch subscription info: {:#}", e);
            SubscriptionInfo::Failed {
                error: format!("{:#}", e),
            }
        }
    }
}
