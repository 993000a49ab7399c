//! Computed KPI values

use crate::definitions::{Grade, Kpi, TargetBand};
use serde::Serialize;
use std::fmt;
use volley_core::{InferenceConfidence, Provenance};

/// One KPI computed over one bucket.
///
/// `denominator == 0` means insufficient data: the value is `0.0` but must
/// not be read as zero performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiResult {
    pub kpi: Kpi,
    pub value: f64,
    /// Fractional under half-credit rules; negative for attack efficiency
    pub numerator: f64,
    pub denominator: u64,
    pub target: TargetBand,
    pub lower_is_better: bool,
    pub provenance: Provenance,
}

impl KpiResult {
    /// Wrap a calculated value with its counts and catalogue targets
    pub fn new(kpi: Kpi, value: f64, numerator: f64, denominator: u64) -> Self {
        let def = kpi.definition();
        Self {
            kpi,
            value,
            numerator,
            denominator,
            target: def.target,
            lower_is_better: def.lower_is_better,
            provenance: Provenance::Measured,
        }
    }

    /// Result with no observations
    pub fn insufficient(kpi: Kpi) -> Self {
        Self::new(kpi, 0.0, 0.0, 0)
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn is_insufficient(&self) -> bool {
        self.denominator == 0
    }

    pub fn grade(&self) -> Grade {
        if self.is_insufficient() {
            Grade::NoData
        } else {
            self.target.grade(self.value, self.lower_is_better)
        }
    }

    pub fn meets_target(&self) -> bool {
        !self.is_insufficient() && self.target.meets_target(self.value, self.lower_is_better)
    }

    pub fn confidence(&self) -> InferenceConfidence {
        self.provenance.confidence()
    }
}

impl fmt::Display for KpiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.kpi.definition().short_name;
        if self.is_insufficient() {
            return write!(f, "{short}: N/A");
        }
        if self.kpi.is_proportion() || self.kpi == Kpi::AttackEfficiency {
            write!(f, "{short}: {:.1}%", self.value * 100.0)?;
        } else {
            write!(f, "{short}: {:.2}", self.value)?;
        }
        write!(f, " ({}/{})", self.numerator, self.denominator)?;
        if self.provenance.is_estimate() {
            write!(f, " [{}]", self.provenance)?;
        }
        Ok(())
    }
}
