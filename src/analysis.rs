//! Match-level orchestration
//!
//! [`MatchAnalysis`] owns one normalized feed and its rally classification.
//! Every query on it is a pure function of that immutable state, so callers
//! may memoize results under a [`MetricKey`].

use crate::annotate::{annotate, compare_with, Annotation};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use volley_aggregate::{AggregateBucket, Aggregator, Dimension, GroupKey, OutcomeBreakdown};
use volley_confidence::{ConfidenceLevel, SignificanceMarker, SignificanceTest};
use volley_core::{AnalysisConfig, AnalysisContext, PointId, Result};
use volley_kpi::{Kpi, KpiResult};
use volley_normalize::{MatchFeed, Normalizer, RawSource};
use volley_rally::{MomentumSummary, RallyClassification, RallyClassifier};

/// Cache key for one breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MetricKey {
    pub dimension: Dimension,
    pub kpi: Kpi,
}

impl MetricKey {
    pub fn new(dimension: Dimension, kpi: Kpi) -> Self {
        Self { dimension, kpi }
    }
}

/// Per-key results for one (dimension, KPI)
pub type Breakdown = BTreeMap<GroupKey, KpiResult>;

/// Whole-match results
#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub results: BTreeMap<Kpi, KpiResult>,
    pub totals: AggregateBucket,
    pub momentum: MomentumSummary,
    pub classified_points: usize,
    pub skipped_points: Vec<PointId>,
    /// Points classified by each strategy
    pub strategies: BTreeMap<&'static str, usize>,
}

impl TeamSummary {
    pub fn get(&self, kpi: Kpi) -> Option<&KpiResult> {
        self.results.get(&kpi)
    }
}

/// One match, classified and ready for aggregation
#[derive(Debug, Clone)]
pub struct MatchAnalysis {
    feed: MatchFeed,
    classification: RallyClassification,
    config: AnalysisConfig,
    level: ConfidenceLevel,
    significance: SignificanceTest,
}

impl MatchAnalysis {
    /// Classify `feed` with the default strategy list
    pub fn new(ctx: &AnalysisContext, feed: MatchFeed) -> Result<Self> {
        Self::with_classifier(ctx, feed, &RallyClassifier::new())
    }

    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, events = feed.events.len()))]
    pub fn with_classifier(
        ctx: &AnalysisContext,
        feed: MatchFeed,
        classifier: &RallyClassifier,
    ) -> Result<Self> {
        let config = ctx.config().clone();
        let level = ConfidenceLevel::new(config.confidence_level)?;
        let significance = SignificanceTest::new(config.significance_alpha)?;
        let classification = classifier.classify(ctx, &feed.events, &feed.points);

        Ok(Self {
            feed,
            classification,
            config,
            level,
            significance,
        })
    }

    /// Normalize `sources` and classify the result, timing both stages on
    /// `ctx`
    pub fn from_sources(ctx: &mut AnalysisContext, sources: &[RawSource]) -> Result<Self> {
        let feed = Normalizer::normalize(ctx, sources)?;
        ctx.time_stage("classify", |ctx| Self::new(ctx, feed))
    }

    pub fn feed(&self) -> &MatchFeed {
        &self.feed
    }

    pub fn classification(&self) -> &RallyClassification {
        &self.classification
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.feed.events, &self.classification, &self.config)
    }

    pub fn buckets(&self, dimension: Dimension) -> BTreeMap<GroupKey, AggregateBucket> {
        self.aggregator().group(dimension)
    }

    /// One result per key of `dimension` for `kpi`.
    ///
    /// Rally KPIs have no player or position breakdown. Position groups
    /// with no attempts for `kpi` are left out rather than shown as zero.
    pub fn breakdown(&self, dimension: Dimension, kpi: Kpi) -> Breakdown {
        if kpi.is_rally_based() && !dimension.carries_rallies() {
            return Breakdown::new();
        }
        breakdown_from(&self.buckets(dimension), dimension, kpi, &self.config)
    }

    pub fn breakdown_for(&self, key: MetricKey) -> Breakdown {
        self.breakdown(key.dimension, key.kpi)
    }

    /// Every (dimension, KPI) breakdown, grouping each dimension once
    #[instrument(skip(self))]
    pub fn all_breakdowns(&self) -> BTreeMap<MetricKey, Breakdown> {
        #[cfg(feature = "parallel")]
        let per_dimension: Vec<Vec<(MetricKey, Breakdown)>> = {
            use rayon::prelude::*;
            Dimension::ALL
                .par_iter()
                .map(|dimension| self.dimension_breakdowns(*dimension))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let per_dimension: Vec<Vec<(MetricKey, Breakdown)>> = Dimension::ALL
            .iter()
            .map(|dimension| self.dimension_breakdowns(*dimension))
            .collect();

        let all: BTreeMap<MetricKey, Breakdown> = per_dimension.into_iter().flatten().collect();
        debug!(breakdowns = all.len(), "computed all breakdowns");
        all
    }

    fn dimension_breakdowns(&self, dimension: Dimension) -> Vec<(MetricKey, Breakdown)> {
        let buckets = self.buckets(dimension);
        Kpi::ALL
            .iter()
            .filter(|kpi| !kpi.is_rally_based() || dimension.carries_rallies())
            .map(|kpi| {
                (
                    MetricKey::new(dimension, *kpi),
                    breakdown_from(&buckets, dimension, *kpi, &self.config),
                )
            })
            .collect()
    }

    /// Every KPI over the whole match
    pub fn team_summary(&self) -> TeamSummary {
        let totals = self.aggregator().team();
        let results = Kpi::ALL
            .iter()
            .map(|kpi| (*kpi, totals.kpi(*kpi, &self.config)))
            .collect();

        TeamSummary {
            results,
            totals,
            momentum: self.momentum(),
            classified_points: self.classification.points.len(),
            skipped_points: self.classification.skipped.clone(),
            strategies: self.classification.strategy_counts(),
        }
    }

    pub fn momentum(&self) -> MomentumSummary {
        self.classification.momentum()
    }

    /// Outcome tallies over the whole match
    pub fn outcomes(&self) -> OutcomeBreakdown {
        OutcomeBreakdown::from_events(&self.feed.events)
    }

    /// Outcome tallies for one group
    pub fn outcomes_for(&self, key: &GroupKey) -> OutcomeBreakdown {
        let dimension = key.dimension();
        OutcomeBreakdown::from_events(
            self.feed
                .events
                .iter()
                .filter(|e| dimension.key_for(e, &self.config).as_ref() == Some(key)),
        )
    }

    /// Annotate at the configured confidence level
    pub fn annotate(&self, result: &KpiResult) -> Annotation {
        annotate(result, self.level)
    }

    /// Compare at the configured significance level
    pub fn compare(&self, a: &KpiResult, b: &KpiResult) -> Option<SignificanceMarker> {
        compare_with(a, b, &self.significance)
    }
}

fn breakdown_from(
    buckets: &BTreeMap<GroupKey, AggregateBucket>,
    dimension: Dimension,
    kpi: Kpi,
    config: &AnalysisConfig,
) -> Breakdown {
    buckets
        .iter()
        .map(|(key, bucket)| (key.clone(), bucket.kpi(kpi, config)))
        .filter(|(_, result)| dimension != Dimension::Position || !result.is_insufficient())
        .collect()
}
