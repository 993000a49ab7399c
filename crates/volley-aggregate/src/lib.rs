//! Aggregation of volleyball events by grouping dimension
//!
//! [`Aggregator::group`] produces one [`AggregateBucket`] per distinct
//! player, position group, set or rotation; [`AggregateBucket::kpi`] turns a
//! bucket into [`KpiResult`](volley_kpi::KpiResult)s.
//!
//! Grouping rules:
//! - team-error placeholders are left out of player buckets but count for
//!   the team
//! - unrecognized position codes are left out of position buckets
//! - a libero's attacks and blocks are left out of position buckets
//! - rally counters reach set and rotation buckets only, taken from tracked
//!   points when a bucket has any and from the adjacency proxy otherwise

mod aggregator;
mod breakdown;
mod bucket;

pub use aggregator::{Aggregator, Dimension, GroupKey};
pub use breakdown::OutcomeBreakdown;
pub use bucket::AggregateBucket;
