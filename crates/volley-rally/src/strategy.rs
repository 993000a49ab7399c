//! Rally inference strategies
//!
//! The classifier tries strategies in priority order and keeps the first
//! answer. Each strategy declares the provenance of what it produces so a
//! side-out rate built on heuristics is never presented as measured.

use crate::rally::{ClassifiedPoint, Rally};
use volley_core::{AnalysisConfig, Provenance, RallyDirection};

/// Properties of a strategy that don't depend on the rally
pub trait RallyStrategyProperties {
    /// Short name recorded on every point the strategy classifies
    fn strategy_name(&self) -> &'static str;

    /// Best provenance this strategy can produce
    fn provenance(&self) -> Provenance;
}

/// Classify one rally, or decline with `None`
pub trait RallyStrategy: RallyStrategyProperties + Send + Sync {
    fn classify(&self, rally: &Rally<'_>, config: &AnalysisConfig) -> Option<ClassifiedPoint>;
}

fn classified(
    rally: &Rally<'_>,
    direction: RallyDirection,
    won: bool,
    provenance: Provenance,
    strategy: &'static str,
) -> ClassifiedPoint {
    let record_provenance = rally.record.map_or(Provenance::Measured, |r| r.provenance);
    ClassifiedPoint {
        point_id: rally.point_id.clone(),
        set_number: rally.set_number,
        rotation: rally.rotation(),
        rotation_estimated: rally.rotation_estimated(),
        direction,
        won,
        rally_length: rally.len(),
        provenance: provenance.weakest(record_provenance),
        strategy,
    }
}

/// Trust a record carrying both direction and winner
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitPointStrategy;

impl RallyStrategyProperties for ExplicitPointStrategy {
    fn strategy_name(&self) -> &'static str {
        "explicit"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Measured
    }
}

impl RallyStrategy for ExplicitPointStrategy {
    fn classify(&self, rally: &Rally<'_>, _config: &AnalysisConfig) -> Option<ClassifiedPoint> {
        let record = rally.record?;
        let direction = record.direction?;
        let won = record.won()?;
        Some(classified(
            rally,
            direction,
            won,
            self.provenance(),
            self.strategy_name(),
        ))
    }
}

/// Fill in whatever the record lacks from the rally's events.
///
/// Direction comes from event order; the winner, when unrecorded, is taken
/// to be us iff any of our contacts was a kill. The kill rule misreads
/// rallies that continue after a kill, so its points are tagged
/// [`Provenance::KillHeuristic`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceDirectionStrategy;

impl RallyStrategyProperties for SequenceDirectionStrategy {
    fn strategy_name(&self) -> &'static str {
        "sequence"
    }

    fn provenance(&self) -> Provenance {
        Provenance::DirectionInferred
    }
}

impl RallyStrategy for SequenceDirectionStrategy {
    fn classify(&self, rally: &Rally<'_>, config: &AnalysisConfig) -> Option<ClassifiedPoint> {
        let recorded_direction = rally.record.and_then(|r| r.direction);
        let recorded_won = rally.record.and_then(|r| r.won());

        let (direction, direction_provenance) = match recorded_direction {
            Some(direction) => (direction, Provenance::Measured),
            None => (
                rally.infer_direction(config.receive_only_rallies)?,
                Provenance::DirectionInferred,
            ),
        };

        let (won, winner_provenance) = match recorded_won {
            Some(won) => (won, Provenance::Measured),
            None if rally.is_empty() => return None,
            None => (rally.has_kill(), Provenance::KillHeuristic),
        };

        Some(classified(
            rally,
            direction,
            won,
            direction_provenance.weakest(winner_provenance),
            self.strategy_name(),
        ))
    }
}
