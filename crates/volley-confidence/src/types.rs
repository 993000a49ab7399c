//! Common types for confidence intervals

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use volley_core::{Error, Result};

/// A confidence interval with lower and upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
    /// The point estimate
    pub estimate: f64,
    /// Confidence level (e.g., 0.95 for 95% CI)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Half-width
    pub fn margin_of_error(&self) -> f64 {
        self.width() / 2.0
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Check if intervals overlap
    pub fn overlaps(&self, other: &ConfidenceInterval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.4}, {:.4}], estimate: {:.4}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.estimate
        )
    }
}

/// Two-sided critical values used verbatim for the conventional levels
const Z_TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.58)];

/// Confidence level with its two-sided critical value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceLevel {
    level: f64,
    z: f64,
}

impl ConfidenceLevel {
    pub const NINETY: Self = Self { level: 0.90, z: 1.645 };
    pub const NINETY_FIVE: Self = Self { level: 0.95, z: 1.96 };
    pub const NINETY_NINE: Self = Self { level: 0.99, z: 2.58 };

    /// Create a confidence level, rejecting values outside (0, 1).
    ///
    /// 90%, 95% and 99% use the tabulated z of 1.645, 1.96 and 2.58; any
    /// other level uses the standard normal quantile.
    pub fn new(level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(Error::invalid_probability("confidence_level", level));
        }

        if let Some(&(_, z)) = Z_TABLE.iter().find(|(l, _)| (l - level).abs() < 1e-9) {
            return Ok(Self { level, z });
        }

        let z = standard_normal()?.inverse_cdf(1.0 - (1.0 - level) / 2.0);
        Ok(Self { level, z })
    }

    /// Level matching a two-sided significance `alpha`
    pub fn from_alpha(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::invalid_probability("significance_alpha", alpha));
        }
        Self::new(1.0 - alpha)
    }

    pub fn value(&self) -> f64 {
        self.level
    }

    /// 1 - confidence level
    pub fn alpha(&self) -> f64 {
        1.0 - self.level
    }

    /// Two-sided critical value
    pub fn z_critical(&self) -> f64 {
        self.z
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = Error;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.level * 100.0)
    }
}

pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| {
        Error::InvalidParameter(format!("Failed to create normal distribution: {}", e))
    })
}
