//! # Volley Stats
//!
//! A metrics engine for volleyball matches: takes per-action event logs,
//! per-rally records and per-set stat sheets, and derives team, player,
//! position, set and rotation KPIs with proportion statistics.
//!
//! ## Crates
//!
//! - [`volley_core`]: event model, configuration, analysis context, provenance tags
//! - [`volley_normalize`]: raw tables to canonical events
//! - [`volley_rally`]: rally direction classification and momentum
//! - [`volley_kpi`]: KPI catalogue and pure ratio calculators
//! - [`volley_aggregate`]: grouping by dimension
//! - [`volley_confidence`]: intervals, reliability tiers, significance tests
//!
//! ## Quick Start
//!
//! ```rust
//! use volley_stats::prelude::*;
//!
//! let rotation = Rotation::new(1)?;
//! let events = vec![
//!     Event::new(1, rotation, "Alex", Action::Attack, Outcome::Kill)?.with_position("OH1"),
//!     Event::new(1, rotation, "Alex", Action::Attack, Outcome::Defended)?.with_position("OH1"),
//! ];
//!
//! let ctx = AnalysisContext::default();
//! let analysis = MatchAnalysis::new(&ctx, MatchFeed::new(events, Vec::new()))?;
//!
//! let by_player = analysis.breakdown(Dimension::Player, Kpi::AttackKillPct);
//! let alex = &by_player[&GroupKey::Player("Alex".into())];
//! assert_eq!(alex.value, 0.5);
//!
//! let annotation = analysis.annotate(alex);
//! assert_eq!(annotation.reliability, ReliabilityTier::Low);
//! # Ok::<(), volley_stats::Error>(())
//! ```
//!
//! ## Features
//!
//! - `parallel`: compute the dimensions of [`MatchAnalysis::all_breakdowns`]
//!   on the rayon thread pool

pub mod analysis;
pub mod annotate;

pub use volley_aggregate;
pub use volley_confidence;
pub use volley_core;
pub use volley_kpi;
pub use volley_normalize;
pub use volley_rally;

pub use analysis::{Breakdown, MatchAnalysis, MetricKey, TeamSummary};
pub use annotate::{annotate, compare, Annotation};
pub use volley_core::{Error, Result};

/// Common imports for match analysis
pub mod prelude {
    pub use crate::analysis::{Breakdown, MatchAnalysis, MetricKey, TeamSummary};
    pub use crate::annotate::{annotate, compare, Annotation};

    pub use volley_aggregate::{AggregateBucket, Dimension, GroupKey, OutcomeBreakdown};
    pub use volley_confidence::{
        proportion_ci, ConfidenceInterval, ConfidenceLevel, ReliabilityTier, SignificanceMarker,
    };
    pub use volley_core::prelude::*;
    pub use volley_core::CreditRule;
    pub use volley_kpi::{Grade, Kpi, KpiResult};
    pub use volley_normalize::{Cell, MatchFeed, Normalizer, RawSource, RawTable, StatSheet};
    pub use volley_rally::{MomentumSummary, RallyClassifier};
}
