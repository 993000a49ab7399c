//! Sample-size reliability tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative confidence in a ratio based on its sample size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReliabilityTier {
    Low,
    Medium,
    High,
}

impl ReliabilityTier {
    /// Minimum sample size for `High`
    pub const HIGH_THRESHOLD: u64 = 50;
    /// Minimum sample size for `Medium`
    pub const MEDIUM_THRESHOLD: u64 = 20;

    pub fn from_sample_size(total: u64) -> Self {
        if total >= Self::HIGH_THRESHOLD {
            Self::High
        } else if total >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for ReliabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
