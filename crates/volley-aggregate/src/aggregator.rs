//! Grouping events into buckets

use crate::bucket::AggregateBucket;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};
use volley_core::{
    Action, AnalysisConfig, Event, PositionGroup, Provenance, Rotation,
};
use volley_rally::{ClassifiedPoint, RallyClassification};

/// Grouping key selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Player,
    Position,
    Set,
    Rotation,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Player,
        Dimension::Position,
        Dimension::Set,
        Dimension::Rotation,
    ];

    /// Whether rallies can be attributed to this dimension's keys
    pub fn carries_rallies(&self) -> bool {
        matches!(self, Self::Set | Self::Rotation)
    }

    /// Key for `event`, or `None` when the event is excluded from this
    /// grouping
    pub fn key_for(&self, event: &Event, config: &AnalysisConfig) -> Option<GroupKey> {
        match self {
            Self::Player => {
                if config.is_team_placeholder(&event.player) {
                    None
                } else {
                    Some(GroupKey::Player(event.player.trim().to_string()))
                }
            }
            Self::Position => {
                let group = PositionGroup::from_code(&event.position)?;
                let attack_or_block = matches!(event.action, Action::Attack | Action::Block);
                if attack_or_block && !group.can_attack_or_block() {
                    None
                } else {
                    Some(GroupKey::Position(group))
                }
            }
            Self::Set => Some(GroupKey::Set(event.set_number)),
            Self::Rotation => Some(GroupKey::Rotation(event.rotation)),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Player => "player",
            Self::Position => "position",
            Self::Set => "set",
            Self::Rotation => "rotation",
        })
    }
}

/// A distinct value of a [`Dimension`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Player(String),
    Position(PositionGroup),
    Set(u32),
    Rotation(Rotation),
}

impl GroupKey {
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Player(_) => Dimension::Player,
            Self::Position(_) => Dimension::Position,
            Self::Set(_) => Dimension::Set,
            Self::Rotation(_) => Dimension::Rotation,
        }
    }

    fn matches_point(&self, point: &ClassifiedPoint) -> bool {
        match self {
            Self::Set(set) => point.set_number == *set,
            Self::Rotation(rotation) => point.rotation == Some(*rotation),
            Self::Player(_) | Self::Position(_) => false,
        }
    }

    fn matches_run(&self, set: u32, rotation: Rotation) -> bool {
        match self {
            Self::Set(s) => *s == set,
            Self::Rotation(r) => *r == rotation,
            Self::Player(_) | Self::Position(_) => false,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(name) => f.write_str(name),
            Self::Position(group) => write!(f, "{group}"),
            Self::Set(set) => write!(f, "Set {set}"),
            Self::Rotation(rotation) => write!(f, "{rotation}"),
        }
    }
}

// Keys serialize as their display text so keyed maps stay JSON objects.
impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Groups one match's events along any dimension.
///
/// Holds only borrows of the immutable feed and classification; repeated
/// calls return identical buckets.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    events: &'a [Event],
    classification: &'a RallyClassification,
    config: &'a AnalysisConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        events: &'a [Event],
        classification: &'a RallyClassification,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            events,
            classification,
            config,
        }
    }

    /// One bucket per distinct key of `dimension`
    #[instrument(skip(self), fields(events = self.events.len()))]
    pub fn group(&self, dimension: Dimension) -> BTreeMap<GroupKey, AggregateBucket> {
        let mut buckets: BTreeMap<GroupKey, AggregateBucket> = BTreeMap::new();

        for (index, event) in self.events.iter().enumerate() {
            let Some(key) = dimension.key_for(event, self.config) else {
                continue;
            };
            let bucket = buckets.entry(key).or_default();
            bucket.record(event, self.classification.is_set_converted(index));
            if dimension == Dimension::Rotation && event.is_synthesized() {
                bucket.provenance = bucket.provenance.weakest(Provenance::Synthesized);
            }
        }

        if dimension.carries_rallies() {
            for point in &self.classification.points {
                let key = match dimension {
                    Dimension::Set => Some(GroupKey::Set(point.set_number)),
                    _ => point.rotation.map(GroupKey::Rotation),
                };
                if let Some(key) = key {
                    buckets.entry(key).or_default();
                }
            }
            for (key, bucket) in buckets.iter_mut() {
                self.attach_rallies(key, bucket);
            }
        }

        debug!(%dimension, buckets = buckets.len(), "grouped events");
        buckets
    }

    /// Whole-match bucket, team placeholders included
    #[instrument(skip(self), fields(events = self.events.len()))]
    pub fn team(&self) -> AggregateBucket {
        let mut bucket = AggregateBucket::default();
        for (index, event) in self.events.iter().enumerate() {
            bucket.record(event, self.classification.is_set_converted(index));
        }

        let counters = &self.classification.counters;
        if !counters.is_empty() {
            bucket.apply_rallies(counters);
        }
        let proxy = self.classification.proxy_where(|_, _| true);
        if !proxy.is_empty() {
            bucket.apply_estimate(&proxy);
        }
        bucket
    }

    /// Tracked counters for the key's classified points plus the proxy for
    /// its (set, rotation) runs that have none
    fn attach_rallies(&self, key: &GroupKey, bucket: &mut AggregateBucket) {
        let counters = self.classification.counters_where(|p| key.matches_point(p));
        if !counters.is_empty() {
            bucket.apply_rallies(&counters);
            let estimated_rotation = key.dimension() == Dimension::Rotation
                && self
                    .classification
                    .points
                    .iter()
                    .any(|p| key.matches_point(p) && p.rotation_estimated);
            if estimated_rotation {
                bucket.rally_provenance = bucket.rally_provenance.weakest(Provenance::Synthesized);
            }
        }

        let proxy = self
            .classification
            .proxy_where(|set, rotation| key.matches_run(set, rotation));
        if !proxy.is_empty() {
            bucket.apply_estimate(&proxy);
        }
    }
}
