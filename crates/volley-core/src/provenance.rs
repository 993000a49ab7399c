//! Provenance tags for derived numbers
//!
//! Heuristic and measured values must never be presented identically. Every
//! classified point and every KPI result carries the weakest provenance of
//! the inputs that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a number came from, ordered from most to least trustworthy
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Read directly from recorded data
    #[default]
    Measured,
    /// Rally direction inferred from event order; winner recorded
    DirectionInferred,
    /// Winner inferred from the presence of a kill in the rally
    KillHeuristic,
    /// Event or rotation distributed round-robin from aggregate counts
    Synthesized,
    /// Rally rates approximated from reception/attack adjacency
    ProxyEstimate,
}

/// Qualitative confidence attached to a provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceConfidence {
    High,
    Medium,
    Low,
}

impl Provenance {
    /// The less trustworthy of two provenances
    pub fn weakest(self, other: Provenance) -> Provenance {
        self.max(other)
    }

    /// Weakest provenance of an iterator, `Measured` when empty
    pub fn weakest_of<I: IntoIterator<Item = Provenance>>(iter: I) -> Provenance {
        iter.into_iter().fold(Provenance::Measured, Provenance::weakest)
    }

    pub fn confidence(&self) -> InferenceConfidence {
        match self {
            Self::Measured => InferenceConfidence::High,
            Self::DirectionInferred => InferenceConfidence::Medium,
            Self::KillHeuristic | Self::Synthesized | Self::ProxyEstimate => {
                InferenceConfidence::Low
            }
        }
    }

    /// Whether the value is an approximation rather than a measurement
    pub fn is_estimate(&self) -> bool {
        !matches!(self, Self::Measured)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::DirectionInferred => "direction inferred",
            Self::KillHeuristic => "kill heuristic",
            Self::Synthesized => "synthesized",
            Self::ProxyEstimate => "proxy estimate",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
