//! Statistical annotation of KPI results

use serde::Serialize;
use volley_confidence::{
    proportion_ci, ConfidenceInterval, ConfidenceLevel, ReliabilityTier, SignificanceMarker,
    SignificanceTest,
};
use volley_core::Result;
use volley_kpi::KpiResult;

/// Interval and reliability for one result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Annotation {
    /// `None` for signed or unbounded KPIs
    pub interval: Option<ConfidenceInterval>,
    pub reliability: ReliabilityTier,
}

/// Confidence interval and reliability tier for `result`.
///
/// The interval treats the numerator as successes out of the denominator;
/// attack efficiency and the ace/error ratio are not proportions and get no
/// interval.
pub fn annotate(result: &KpiResult, level: ConfidenceLevel) -> Annotation {
    let interval = result
        .kpi
        .is_proportion()
        .then(|| proportion_ci(result.numerator, result.denominator, level));
    Annotation {
        interval,
        reliability: ReliabilityTier::from_sample_size(result.denominator),
    }
}

/// Significance marker for `a` against `b` at `alpha`.
///
/// `Ok(None)` when the difference is not significant, when either side has
/// no observations, or when the two results are different KPIs or not
/// proportions. An `alpha` outside (0, 1) is an error.
pub fn compare(a: &KpiResult, b: &KpiResult, alpha: f64) -> Result<Option<SignificanceMarker>> {
    let test = SignificanceTest::new(alpha)?;
    Ok(compare_with(a, b, &test))
}

pub(crate) fn compare_with(
    a: &KpiResult,
    b: &KpiResult,
    test: &SignificanceTest,
) -> Option<SignificanceMarker> {
    if a.kpi != b.kpi || !a.kpi.is_proportion() {
        return None;
    }
    test.marker(a.numerator, a.denominator, b.numerator, b.denominator)
}
