use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use salesdash_core::PipelineStage;
use serde::Serialize;

/// Every KPI the dashboard shows, computed in one pass over the prospects.
///
/// Rates are integer percentages in `0..=100`. Serialized with camelCase keys
/// for the page's chart script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total: usize,
    pub success_rate: u32,
    pub failure_rate: u32,
    pub no_response_rate: u32,
    /// Mean calls over prospects with at least one call, one decimal.
    pub avg_calls: f64,
    /// Mean resolved price of signed deals, whole currency units.
    pub avg_price: i64,
    pub venue_stats: Vec<VenueStats>,
    /// Every channel, sorted by label.
    pub channel_stats: Vec<ChannelStats>,
    pub top_channels: Vec<ChannelStats>,
    pub top_channels_by_rate: Vec<ChannelStats>,
    pub missing_channel_rate: u32,
    /// Six months ending at the current one, oldest first.
    pub monthly_trend: Vec<MonthlyCount>,
    /// Declines by reason, most frequent first.
    pub refusal_reasons: Vec<RefusalReason>,
    pub too_expensive_rate: u32,
    /// One row per stage, in funnel order.
    pub pipeline: Vec<PipelineRow>,
    /// Prospects with no status or a status outside the seven stages.
    pub unclassified: usize,
    pub generated_at: DateTime<Local>,
    /// `generated_at` as `dd/mm/yyyy HH:MM:SS`.
    pub last_update: String,
}

impl MetricsSnapshot {
    /// Share of prospects neither signed, declined nor silent.
    #[must_use]
    pub fn in_progress_rate(&self) -> u32 {
        100u32.saturating_sub(self.success_rate + self.failure_rate + self.no_response_rate)
    }

    /// Total number of declines across all reasons.
    #[must_use]
    pub fn total_refusals(&self) -> usize {
        self.refusal_reasons.iter().map(|r| r.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueStats {
    pub venue: String,
    pub total: usize,
    pub success: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub channel: String,
    pub total: usize,
    pub conversions: usize,
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefusalReason {
    pub reason: String,
    pub count: usize,
    /// Percentage of all declines.
    pub share: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRow {
    pub stage: PipelineStage,
    pub label: String,
    pub count: usize,
    pub total_price: Decimal,
    /// Percentage of all prospects.
    pub share: u32,
}
