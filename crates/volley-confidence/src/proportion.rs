//! Normal-approximation intervals for proportions

use crate::types::{ConfidenceInterval, ConfidenceLevel};
use serde::Serialize;

/// Interval for `successes / total` by normal approximation,
/// `p ± z·sqrt(p(1-p)/n)`, clipped to [0, 1].
///
/// `successes` may be fractional (half-credit reception). An empty sample
/// gives the degenerate interval `[0, 0]`.
pub fn proportion_ci(successes: f64, total: u64, level: ConfidenceLevel) -> ConfidenceInterval {
    if total == 0 {
        return ConfidenceInterval::new(0.0, 0.0, 0.0, level.value());
    }

    let p = (successes / total as f64).clamp(0.0, 1.0);
    let margin = margin_of_error(p, total, level);

    ConfidenceInterval::new(
        (p - margin).max(0.0),
        (p + margin).min(1.0),
        p,
        level.value(),
    )
}

/// `z·sqrt(p(1-p)/n)`; zero when `n` is zero
pub fn margin_of_error(p: f64, total: u64, level: ConfidenceLevel) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    level.z_critical() * (p * (1.0 - p) / total as f64).sqrt()
}

/// A proportion and its interval, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentageWithCi {
    pub percentage: f64,
    pub lower: f64,
    pub upper: f64,
}

pub fn percentage_with_ci(successes: f64, total: u64, level: ConfidenceLevel) -> PercentageWithCi {
    let ci = proportion_ci(successes, total, level);
    PercentageWithCi {
        percentage: ci.estimate * 100.0,
        lower: ci.lower * 100.0,
        upper: ci.upper * 100.0,
    }
}

pub fn is_sample_size_sufficient(total: u64, min_sample_size: u64) -> bool {
    total >= min_sample_size
}
