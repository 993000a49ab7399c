//! Pooled two-proportion z-test

use crate::types::{standard_normal, ConfidenceLevel};
use serde::Serialize;
use statrs::distribution::ContinuousCDF;
use std::fmt;
use tracing::trace;
use volley_core::Result;

/// Result of a pooled two-proportion z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoProportionTest {
    pub p1: f64,
    pub p2: f64,
    pub pooled: f64,
    pub standard_error: f64,
    pub z_score: f64,
}

impl TwoProportionTest {
    /// Run the test. `None` when either total is zero or the pooled
    /// standard error is zero (no evidence either way).
    pub fn run(successes1: f64, total1: u64, successes2: f64, total2: u64) -> Option<Self> {
        if total1 == 0 || total2 == 0 {
            return None;
        }

        let (n1, n2) = (total1 as f64, total2 as f64);
        let p1 = successes1 / n1;
        let p2 = successes2 / n2;
        let pooled = (successes1 + successes2) / (n1 + n2);
        let standard_error = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();

        if !(standard_error > 0.0) {
            return None;
        }

        Some(Self {
            p1,
            p2,
            pooled,
            standard_error,
            z_score: (p1 - p2) / standard_error,
        })
    }

    /// Two-sided p-value under the standard normal
    pub fn p_value(&self) -> Result<f64> {
        let normal = standard_normal()?;
        Ok(2.0 * (1.0 - normal.cdf(self.z_score.abs())))
    }
}

/// Which way a significant difference points, first group relative to second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Higher,
    Lower,
}

/// Marker attached to a comparison whose difference is significant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceMarker {
    pub z_score: f64,
    pub alpha: f64,
    pub direction: Direction,
}

impl fmt::Display for SignificanceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("★")
    }
}

/// Significance test at a fixed alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceTest {
    level: ConfidenceLevel,
}

impl SignificanceTest {
    /// Test at two-sided `alpha`; 0.05 uses z = 1.96
    pub fn new(alpha: f64) -> Result<Self> {
        Ok(Self {
            level: ConfidenceLevel::from_alpha(alpha)?,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.level.alpha()
    }

    pub fn z_critical(&self) -> f64 {
        self.level.z_critical()
    }

    /// Marker iff `|z| > z_critical`
    pub fn marker(
        &self,
        successes1: f64,
        total1: u64,
        successes2: f64,
        total2: u64,
    ) -> Option<SignificanceMarker> {
        let test = TwoProportionTest::run(successes1, total1, successes2, total2)?;
        trace!(z = test.z_score, z_critical = self.z_critical(), "two-proportion test");

        if test.z_score.abs() > self.z_critical() {
            Some(SignificanceMarker {
                z_score: test.z_score,
                alpha: self.alpha(),
                direction: if test.z_score > 0.0 {
                    Direction::Higher
                } else {
                    Direction::Lower
                },
            })
        } else {
            None
        }
    }
}

impl Default for SignificanceTest {
    fn default() -> Self {
        Self {
            level: ConfidenceLevel::NINETY_FIVE,
        }
    }
}
