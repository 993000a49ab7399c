//! Explicit point (rally) records

use crate::event::{PointId, Rotation};
use crate::provenance::Provenance;
use serde::{Deserialize, Serialize};

/// Which side of the net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Us,
    Opponent,
}

/// Whether the team served or received first in a rally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RallyDirection {
    Serving,
    Receiving,
}

impl RallyDirection {
    pub fn serving_side(&self) -> Side {
        match self {
            Self::Serving => Side::Us,
            Self::Receiving => Side::Opponent,
        }
    }
}

/// A point as recorded by a team-level tracker, when available.
///
/// Either field may be absent; the classifier falls back to inference for
/// whatever is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub point_id: PointId,
    pub set_number: u32,
    pub rotation: Option<Rotation>,
    pub direction: Option<RallyDirection>,
    pub winner: Option<Side>,
    /// `Synthesized` when rebuilt from per-rotation totals
    pub provenance: Provenance,
}

impl PointRecord {
    pub fn new(point_id: PointId, set_number: u32) -> Self {
        Self {
            point_id,
            set_number,
            rotation: None,
            direction: None,
            winner: None,
            provenance: Provenance::Measured,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_direction(mut self, direction: RallyDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_winner(mut self, winner: Side) -> Self {
        self.winner = Some(winner);
        self
    }

    /// Mark the record as reconstructed rather than tracked
    pub fn synthesized(mut self) -> Self {
        self.provenance = Provenance::Synthesized;
        self
    }

    /// Point won iff the recorded winner is our own side
    pub fn won(&self) -> Option<bool> {
        self.winner.map(|w| w == Side::Us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_follows_winner() {
        let record = PointRecord::new(PointId::from_set_point(1, 4), 1);
        assert_eq!(record.won(), None);
        assert_eq!(record.clone().with_winner(Side::Us).won(), Some(true));
        assert_eq!(record.with_winner(Side::Opponent).won(), Some(false));
    }

    #[test]
    fn test_direction_serving_side() {
        assert_eq!(RallyDirection::Serving.serving_side(), Side::Us);
        assert_eq!(RallyDirection::Receiving.serving_side(), Side::Opponent);
    }
}
