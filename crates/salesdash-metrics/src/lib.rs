//! KPI aggregation over the prospects collection.
//!
//! [`compute`] folds a slice of [`salesdash_core::Prospect`] into a single
//! [`MetricsSnapshot`]. Aggregation is total: missing or malformed fields are
//! treated as absent and never raise.

pub mod aggregate;
pub mod channels;
pub mod price;
pub mod rate;
pub mod snapshot;
pub mod trend;

pub use aggregate::{compute, compute_at};
pub use price::{resolve_price, PRICE_RESOLVERS};
pub use snapshot::{
    ChannelStats, MetricsSnapshot, MonthlyCount, PipelineRow, RefusalReason, VenueStats,
};
