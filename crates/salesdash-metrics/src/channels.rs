//! Acquisition channel attribution and ranking.
//!
//! Ranking policy: channels are ranked by conversion volume. When fewer than
//! [`MIN_VOLUME_CHANNELS`] channels have converted, the ranking switches to
//! conversion rate among channels with at least [`MIN_RATE_SAMPLE`] prospects.
//! Both lists are capped at [`TOP_CHANNELS`] and break ties by label.

use std::collections::BTreeMap;

use salesdash_core::{PipelineStage, Prospect};

use crate::rate::percent;
use crate::snapshot::ChannelStats;

/// Label used for prospects with no channel recorded.
pub const UNSPECIFIED_CHANNEL: &str = "Non renseigné";

pub const TOP_CHANNELS: usize = 5;
pub const MIN_VOLUME_CHANNELS: usize = 3;
pub const MIN_RATE_SAMPLE: usize = 5;

/// Per-channel totals plus the number of prospects without a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBreakdown {
    /// Sorted by channel label.
    pub stats: Vec<ChannelStats>,
    pub missing: usize,
}

#[must_use]
pub fn breakdown(records: &[Prospect]) -> ChannelBreakdown {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut missing = 0usize;

    for record in records {
        let channel = record.channel().unwrap_or_else(|| {
            missing += 1;
            UNSPECIFIED_CHANNEL
        });
        let entry = groups.entry(channel).or_insert((0, 0));
        entry.0 += 1;
        if record.is(PipelineStage::Signed) {
            entry.1 += 1;
        }
    }

    let stats = groups
        .into_iter()
        .map(|(channel, (total, conversions))| ChannelStats {
            channel: channel.to_string(),
            total,
            conversions,
            rate: percent(conversions, total),
        })
        .collect();

    ChannelBreakdown { stats, missing }
}

/// Converting channels by conversion count. The unspecified bucket is left
/// out when more than 80% of all prospects lack a channel.
#[must_use]
pub fn rank_by_volume(breakdown: &ChannelBreakdown, total: usize) -> Vec<ChannelStats> {
    let hide_unspecified = breakdown.missing * 5 > total * 4;

    let mut ranked: Vec<ChannelStats> = breakdown
        .stats
        .iter()
        .filter(|s| s.conversions > 0)
        .filter(|s| !(hide_unspecified && s.channel == UNSPECIFIED_CHANNEL))
        .cloned()
        .collect();

    ranked.sort_by(|a, b| {
        b.conversions
            .cmp(&a.conversions)
            .then_with(|| a.channel.cmp(&b.channel))
    });
    ranked.truncate(TOP_CHANNELS);
    ranked
}

/// Converting channels with a meaningful sample, by conversion rate.
#[must_use]
pub fn rank_by_rate(breakdown: &ChannelBreakdown) -> Vec<ChannelStats> {
    let mut ranked: Vec<ChannelStats> = breakdown
        .stats
        .iter()
        .filter(|s| s.total >= MIN_RATE_SAMPLE && s.conversions > 0)
        .cloned()
        .collect();

    ranked.sort_by(|a, b| b.rate.cmp(&a.rate).then_with(|| a.channel.cmp(&b.channel)));
    ranked.truncate(TOP_CHANNELS);
    ranked
}

/// Picks the headline ranking: by volume when it has enough entries,
/// otherwise by rate.
#[must_use]
pub fn top_channels(by_volume: Vec<ChannelStats>, by_rate: &[ChannelStats]) -> Vec<ChannelStats> {
    if by_volume.len() >= MIN_VOLUME_CHANNELS {
        by_volume
    } else {
        by_rate.to_vec()
    }
}
