//! Builds a [`MetricsSnapshot`] from the full prospects collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use salesdash_core::{PipelineStage, Prospect};

use crate::channels::{breakdown, rank_by_rate, rank_by_volume, top_channels};
use crate::price::resolve_price;
use crate::rate::{percent, round_one_decimal};
use crate::snapshot::{MetricsSnapshot, PipelineRow, RefusalReason, VenueStats};
use crate::trend::monthly_trend;

/// Venues tracked on the dashboard; other venue labels are ignored.
pub const KNOWN_VENUES: [&str; 2] = ["Rooftop", "Tama"];

/// Reason label for prospects declined without a recorded reason.
pub const UNSPECIFIED_REASON: &str = "Non spécifié";

/// Reason label counted by `too_expensive_rate`.
pub const TOO_EXPENSIVE_REASON: &str = "Trop Cher";

/// Computes the snapshot, stamping it with the local wall clock.
#[must_use]
pub fn compute(records: &[Prospect]) -> MetricsSnapshot {
    compute_at(records, Local::now())
}

/// Computes the snapshot as of `now`. Pure apart from logging.
#[must_use]
pub fn compute_at(records: &[Prospect], now: DateTime<Local>) -> MetricsSnapshot {
    let total = records.len();
    if total == 0 {
        tracing::warn!("no prospects to aggregate");
    }

    let count_in = |stage: PipelineStage| records.iter().filter(|r| r.is(stage)).count();
    let signed = count_in(PipelineStage::Signed);
    let declined = count_in(PipelineStage::Declined);
    let no_response = count_in(PipelineStage::NoResponse);

    let channels = breakdown(records);
    let by_volume = rank_by_volume(&channels, total);
    let top_channels_by_rate = rank_by_rate(&channels);
    let ranked_channels = top_channels(by_volume, &top_channels_by_rate);

    let refusal_reasons = refusal_reasons(records);
    let too_expensive = refusal_reasons
        .iter()
        .find(|r| r.reason == TOO_EXPENSIVE_REASON)
        .map_or(0, |r| r.count);

    let pipeline = pipeline(records);
    let unclassified = total - pipeline.iter().map(|row| row.count).sum::<usize>();

    let snapshot = MetricsSnapshot {
        total,
        success_rate: percent(signed, total),
        failure_rate: percent(declined, total),
        no_response_rate: percent(no_response, total),
        avg_calls: average_calls(records),
        avg_price: average_signed_price(records),
        venue_stats: venue_stats(records),
        channel_stats: channels.stats,
        top_channels: ranked_channels,
        top_channels_by_rate,
        missing_channel_rate: percent(channels.missing, total),
        monthly_trend: monthly_trend(records, now.date_naive()),
        too_expensive_rate: percent(too_expensive, declined),
        refusal_reasons,
        pipeline,
        unclassified,
        generated_at: now,
        last_update: now.format("%d/%m/%Y %H:%M:%S").to_string(),
    };

    if unclassified > 0 {
        let unrecognised = records
            .iter()
            .filter(|r| r.status.is_none() && r.raw_status.is_some())
            .count();
        tracing::warn!(
            unclassified,
            unrecognised,
            "prospects without a known pipeline stage were left out of the pipeline table"
        );
    }

    tracing::info!(
        total = snapshot.total,
        success_rate = snapshot.success_rate,
        failure_rate = snapshot.failure_rate,
        no_response_rate = snapshot.no_response_rate,
        avg_calls = snapshot.avg_calls,
        avg_price = snapshot.avg_price,
        channels = snapshot.channel_stats.len(),
        missing_channel_rate = snapshot.missing_channel_rate,
        "KPIs computed"
    );
    for stats in &snapshot.channel_stats {
        tracing::debug!(
            channel = %stats.channel,
            conversions = stats.conversions,
            total = stats.total,
            rate = stats.rate,
            "channel breakdown"
        );
    }

    snapshot
}

/// Mean call count over prospects with a positive call count.
fn average_calls(records: &[Prospect]) -> f64 {
    let calls: Vec<f64> = records
        .iter()
        .filter_map(|r| r.call_count)
        .filter(|&c| c > 0.0)
        .collect();
    if calls.is_empty() {
        return 0.0;
    }

    let sum: f64 = calls.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / calls.len() as f64;
    round_one_decimal(mean)
}

/// Mean resolved price over signed deals that have one, rounded to a whole
/// unit half away from zero.
fn average_signed_price(records: &[Prospect]) -> i64 {
    let prices: Vec<Decimal> = records
        .iter()
        .filter(|r| r.is(PipelineStage::Signed))
        .filter_map(resolve_price)
        .collect();
    if prices.is_empty() {
        return 0;
    }

    let sum = prices
        .iter()
        .fold(Decimal::ZERO, |acc, price| acc.saturating_add(*price));
    let count = Decimal::from(prices.len());
    (sum / count)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

fn venue_stats(records: &[Prospect]) -> Vec<VenueStats> {
    KNOWN_VENUES
        .iter()
        .map(|venue| {
            let listed: Vec<&Prospect> = records
                .iter()
                .filter(|r| r.venues.iter().any(|v| v == venue))
                .collect();
            VenueStats {
                venue: (*venue).to_string(),
                total: listed.len(),
                success: listed
                    .iter()
                    .filter(|r| r.is(PipelineStage::Signed))
                    .count(),
            }
        })
        .collect()
}

fn refusal_reasons(records: &[Prospect]) -> Vec<RefusalReason> {
    let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is(PipelineStage::Declined)) {
        let reason = record
            .refusal_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNSPECIFIED_REASON);
        *histogram.entry(reason).or_insert(0) += 1;
    }

    let declined: usize = histogram.values().sum();
    let mut reasons: Vec<RefusalReason> = histogram
        .into_iter()
        .map(|(reason, count)| RefusalReason {
            reason: reason.to_string(),
            count,
            share: percent(count, declined),
        })
        .collect();
    reasons.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    reasons
}

fn pipeline(records: &[Prospect]) -> Vec<PipelineRow> {
    let total = records.len();
    PipelineStage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage = records.iter().filter(|r| r.is(stage));
            let (count, total_price) = in_stage.fold((0usize, Decimal::ZERO), |(n, sum), r| {
                (n + 1, sum.saturating_add(resolve_price(r).unwrap_or(Decimal::ZERO)))
            });
            PipelineRow {
                stage,
                label: stage.label().to_string(),
                count,
                total_price,
                share: percent(count, total),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
