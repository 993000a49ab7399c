//! Statistical annotation for match metrics
//!
//! Stateless helpers for rate-style KPIs:
//!
//! - **Proportion intervals**: normal approximation `p ± z·sqrt(p(1-p)/n)`,
//!   clipped to [0, 1]
//! - **Reliability tiers**: High (n ≥ 50), Medium (n ≥ 20), Low
//! - **Significance markers**: pooled two-proportion z-test
//!
//! # Example
//!
//! ```rust
//! use volley_confidence::{proportion_ci, ConfidenceLevel, ReliabilityTier};
//!
//! let ci = proportion_ci(18.0, 40, ConfidenceLevel::NINETY_FIVE);
//! assert!(ci.contains(0.45));
//! assert_eq!(ReliabilityTier::from_sample_size(40), ReliabilityTier::Medium);
//! ```

mod proportion;
mod reliability;
mod significance;
mod types;

pub use proportion::{
    is_sample_size_sufficient, margin_of_error, percentage_with_ci, proportion_ci,
    PercentageWithCi,
};
pub use reliability::ReliabilityTier;
pub use significance::{Direction, SignificanceMarker, SignificanceTest, TwoProportionTest};
pub use types::{ConfidenceInterval, ConfidenceLevel};
