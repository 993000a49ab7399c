//! Rally direction classification
//!
//! For each point, decides whether the team served or received first and
//! whether it won, using a priority-ordered list of strategies:
//!
//! 1. [`ExplicitPointStrategy`] - a point record with direction and winner
//! 2. [`SequenceDirectionStrategy`] - direction from event order, winner from
//!    the record or from the kill heuristic
//!
//! Events with no point id cannot form rallies; the [`AdjacencyFallback`]
//! turns them into per-rotation proxy counts instead. Every output carries a
//! [`Provenance`](volley_core::Provenance) naming how it was obtained.
//!
//! # Example
//!
//! ```rust
//! use volley_core::{Action, AnalysisContext, Event, Outcome, PointId, Rotation};
//! use volley_rally::RallyClassifier;
//!
//! let rotation = Rotation::new(1)?;
//! let point = PointId::from_set_point(1, 1);
//! let events = vec![
//!     Event::new(1, rotation, "Sam", Action::Serve, Outcome::Good)?.with_point(point.clone()),
//!     Event::new(1, rotation, "Alex", Action::Attack, Outcome::Kill)?.with_point(point),
//! ];
//!
//! let ctx = AnalysisContext::default();
//! let classification = RallyClassifier::new().classify(&ctx, &events, &[]);
//! assert_eq!(classification.counters.serving_points_won, 1);
//! # Ok::<(), volley_core::Error>(())
//! ```

mod adjacency;
mod classifier;
mod momentum;
mod rally;
mod strategy;

pub use adjacency::{AdjacencyEstimate, AdjacencyFallback};
pub use classifier::{RallyClassification, RallyClassifier, RallyCounters};
pub use momentum::{MomentumSummary, StreakKind};
pub use rally::{group_rallies, ClassifiedPoint, Rally};
pub use strategy::{
    ExplicitPointStrategy, RallyStrategy, RallyStrategyProperties, SequenceDirectionStrategy,
};
