//! Grouping events into rallies

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;
use volley_core::{Action, Event, PointId, PointRecord, Provenance, RallyDirection, Rotation};

/// Events sharing one point id, plus the explicit record for it if any
#[derive(Debug, Clone)]
pub struct Rally<'a> {
    pub point_id: &'a PointId,
    pub set_number: u32,
    /// Events in recorded order
    pub events: Vec<&'a Event>,
    pub record: Option<&'a PointRecord>,
}

impl<'a> Rally<'a> {
    /// Number of recorded contacts
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rotation from the record, else from the first event
    pub fn rotation(&self) -> Option<Rotation> {
        self.record
            .and_then(|r| r.rotation)
            .or_else(|| self.events.first().map(|e| e.rotation))
    }

    /// Whether the rotation was derived rather than recorded
    pub fn rotation_estimated(&self) -> bool {
        match self.record {
            Some(record) if record.rotation.is_some() => {
                record.provenance == Provenance::Synthesized
            }
            _ => self.events.first().is_some_and(|e| e.is_synthesized()),
        }
    }

    /// Direction from event order.
    ///
    /// A reception before the first team serve means we received; a serve
    /// with no prior reception means we served. Without a team serve the
    /// point is ambiguous unless `receive_only` allows a reception alone to
    /// mark it as receiving.
    pub fn infer_direction(&self, receive_only: bool) -> Option<RallyDirection> {
        let first_serve = self.events.iter().position(|e| e.action == Action::Serve);
        let first_receive = self.events.iter().position(|e| e.action == Action::Receive);

        match (first_serve, first_receive) {
            (Some(serve), Some(receive)) if receive < serve => Some(RallyDirection::Receiving),
            (Some(_), _) => Some(RallyDirection::Serving),
            (None, Some(_)) if receive_only => Some(RallyDirection::Receiving),
            (None, _) => None,
        }
    }

    /// Whether any team contact in the rally was a kill
    pub fn has_kill(&self) -> bool {
        self.events.iter().any(|e| e.is_kill())
    }
}

/// Group point-tagged events into rallies in match order.
///
/// Rallies appear in order of the first event carrying their id; explicit
/// records with no events follow in record order. Events without a point id
/// are left out. A record repeating an earlier id is ignored with a
/// warning.
pub fn group_rallies<'a>(events: &'a [Event], points: &'a [PointRecord]) -> Vec<Rally<'a>> {
    let mut records: HashMap<&PointId, &PointRecord> = HashMap::with_capacity(points.len());
    for record in points {
        match records.entry(&record.point_id) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => {
                warn!(point_id = %record.point_id, "duplicate point record ignored");
            }
        }
    }

    let mut rallies: Vec<Rally<'a>> = Vec::new();
    let mut index: HashMap<&PointId, usize> = HashMap::new();

    for event in events {
        let Some(point_id) = event.point_id.as_ref() else {
            continue;
        };
        let slot = *index.entry(point_id).or_insert_with(|| {
            let record = records.get(point_id).copied();
            rallies.push(Rally {
                point_id,
                set_number: record.map_or(event.set_number, |r| r.set_number),
                events: Vec::new(),
                record,
            });
            rallies.len() - 1
        });
        rallies[slot].events.push(event);
    }

    for record in points {
        if !index.contains_key(&record.point_id) {
            index.insert(&record.point_id, rallies.len());
            rallies.push(Rally {
                point_id: &record.point_id,
                set_number: record.set_number,
                events: Vec::new(),
                record: Some(record),
            });
        }
    }

    rallies
}

/// One point after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    pub point_id: PointId,
    pub set_number: u32,
    pub rotation: Option<Rotation>,
    pub rotation_estimated: bool,
    pub direction: RallyDirection,
    pub won: bool,
    pub rally_length: usize,
    /// Weakest source among direction, winner and record
    pub provenance: Provenance,
    /// Name of the strategy that classified the point
    pub strategy: &'static str,
}

impl ClassifiedPoint {
    pub fn serving(&self) -> bool {
        self.direction == RallyDirection::Serving
    }
}
