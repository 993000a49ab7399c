//! Priority-ordered rally classification

use crate::adjacency::{AdjacencyEstimate, AdjacencyFallback};
use crate::momentum::MomentumSummary;
use crate::rally::{group_rallies, ClassifiedPoint};
use crate::strategy::{ExplicitPointStrategy, RallyStrategy, SequenceDirectionStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument, trace};
use volley_core::{Action, AnalysisContext, Event, PointId, PointRecord, Provenance, Rotation};

/// Rally totals in the shape the rally KPIs consume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RallyCounters {
    pub serving_rallies: u64,
    pub serving_points_won: u64,
    pub receiving_rallies: u64,
    pub receiving_points_won: u64,
    /// Weakest provenance among the counted points
    pub provenance: Provenance,
}

impl RallyCounters {
    pub fn record(&mut self, point: &ClassifiedPoint) {
        if point.serving() {
            self.serving_rallies += 1;
            self.serving_points_won += u64::from(point.won);
        } else {
            self.receiving_rallies += 1;
            self.receiving_points_won += u64::from(point.won);
        }
        self.provenance = self.provenance.weakest(point.provenance);
    }

    pub fn rallies(&self) -> u64 {
        self.serving_rallies + self.receiving_rallies
    }

    pub fn is_empty(&self) -> bool {
        self.rallies() == 0
    }
}

/// Everything the classifier derived from one match
#[derive(Debug, Clone, Default)]
pub struct RallyClassification {
    /// Classified points in match order
    pub points: Vec<ClassifiedPoint>,
    pub counters: RallyCounters,
    /// Points no strategy could classify
    pub skipped: Vec<PointId>,
    /// Proxy counts for events without point ids
    pub estimates: BTreeMap<(u32, Rotation), AdjacencyEstimate>,
    /// Indices of set events whose next contact was an attack kill
    pub converted_sets: BTreeSet<usize>,
}

impl RallyClassification {
    /// Counters over the points matching `filter`
    pub fn counters_where<F>(&self, filter: F) -> RallyCounters
    where
        F: Fn(&ClassifiedPoint) -> bool,
    {
        let mut counters = RallyCounters::default();
        for point in self.points.iter().filter(|p| filter(p)) {
            counters.record(point);
        }
        counters
    }

    /// Merged proxy counts over the (set, rotation) keys matching `filter`
    pub fn estimate_where<F>(&self, filter: F) -> AdjacencyEstimate
    where
        F: Fn(u32, Rotation) -> bool,
    {
        let mut merged = AdjacencyEstimate::default();
        for (_, estimate) in self.estimates.iter().filter(|((s, r), _)| filter(*s, *r)) {
            merged.merge(estimate);
        }
        merged
    }

    /// Proxy counts over the matching (set, rotation) runs that have no
    /// classified point. A point without a rotation marks its whole set as
    /// tracked.
    pub fn proxy_where<F>(&self, filter: F) -> AdjacencyEstimate
    where
        F: Fn(u32, Rotation) -> bool,
    {
        let tracked: BTreeSet<(u32, Option<Rotation>)> = self
            .points
            .iter()
            .map(|p| (p.set_number, p.rotation))
            .collect();
        self.estimate_where(|set, rotation| {
            filter(set, rotation)
                && !tracked.contains(&(set, Some(rotation)))
                && !tracked.contains(&(set, None))
        })
    }

    /// Streaks over tracked points; rallies rebuilt from totals have no order
    pub fn momentum(&self) -> MomentumSummary {
        MomentumSummary::from_outcomes(
            self.points
                .iter()
                .filter(|p| p.provenance != Provenance::Synthesized)
                .map(|p| p.won),
        )
    }

    /// Points classified by each strategy
    pub fn strategy_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for point in &self.points {
            *counts.entry(point.strategy).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_set_converted(&self, event_index: usize) -> bool {
        self.converted_sets.contains(&event_index)
    }
}

/// Applies strategies in priority order; the first answer wins
pub struct RallyClassifier {
    strategies: Vec<Box<dyn RallyStrategy>>,
    fallback: AdjacencyFallback,
}

impl Default for RallyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RallyClassifier {
    /// Explicit records first, then event-sequence inference
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(ExplicitPointStrategy),
                Box::new(SequenceDirectionStrategy),
            ],
            fallback: AdjacencyFallback,
        }
    }

    /// A classifier with no strategies; add them with [`Self::with_strategy`]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
            fallback: AdjacencyFallback,
        }
    }

    /// Append a strategy at the lowest priority
    pub fn with_strategy(mut self, strategy: impl RallyStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.strategy_name()).collect()
    }

    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, events = events.len(), records = points.len()))]
    pub fn classify(
        &self,
        ctx: &AnalysisContext,
        events: &[Event],
        points: &[PointRecord],
    ) -> RallyClassification {
        let config = ctx.config();
        let mut classification = RallyClassification::default();

        for rally in group_rallies(events, points) {
            let point = self
                .strategies
                .iter()
                .find_map(|strategy| strategy.classify(&rally, config));

            match point {
                Some(point) => {
                    trace!(
                        point = %point.point_id,
                        strategy = point.strategy,
                        serving = point.serving(),
                        won = point.won,
                        provenance = %point.provenance,
                        "classified point"
                    );
                    classification.counters.record(&point);
                    classification.points.push(point);
                }
                None => {
                    trace!(point = %rally.point_id, "point left unclassified");
                    classification.skipped.push(rally.point_id.clone());
                }
            }
        }

        classification.estimates = self
            .fallback
            .estimate(events.iter().filter(|e| e.point_id.is_none() && !e.from_counts));
        classification.converted_sets = converted_sets(events);

        debug!(
            classified = classification.points.len(),
            skipped = classification.skipped.len(),
            proxy_buckets = classification.estimates.len(),
            converted_sets = classification.converted_sets.len(),
            "rally classification complete"
        );
        classification
    }
}

/// Sets followed directly by an attack kill within the same rally, or the
/// same (set, rotation) run for events without a point id
fn converted_sets(events: &[Event]) -> BTreeSet<usize> {
    #[derive(PartialEq, Eq, Hash)]
    enum Run<'a> {
        Point(&'a PointId),
        Loose(u32, Rotation),
    }

    let mut last_in_run: HashMap<Run<'_>, usize> = HashMap::new();
    let mut converted = BTreeSet::new();

    for (index, event) in events.iter().enumerate() {
        if event.from_counts {
            continue;
        }
        let run = match &event.point_id {
            Some(id) => Run::Point(id),
            None => Run::Loose(event.set_number, event.rotation),
        };
        if let Some(previous) = last_in_run.insert(run, index) {
            if events[previous].action == Action::Set && event.is_attack_kill() {
                converted.insert(previous);
            }
        }
    }
    converted
}
