//! Core types for volleyball match analysis
//!
//! This crate holds the pieces every analysis stage shares:
//!
//! - the canonical [`Event`] record and its action/outcome vocabulary
//! - explicit [`PointRecord`]s from team-level trackers
//! - [`Provenance`] tags separating measured from inferred numbers
//! - [`AnalysisConfig`] and the caller-owned [`AnalysisContext`]
//! - the shared [`Error`] type and recoverable [`DataQualityWarning`]s
//!
//! # Example
//!
//! ```rust
//! use volley_core::{Action, Event, Outcome, Rotation};
//!
//! let event = Event::new(1, Rotation::new(3)?, "Alex", Action::Attack, Outcome::Kill)?
//!     .with_position("OH1");
//! assert!(event.is_attack_kill());
//! # Ok::<(), volley_core::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod point;
pub mod position;
pub mod provenance;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, CreditRule};
pub use context::{AnalysisContext, DataQualityWarning, Diagnostics};
pub use error::{Error, Result};
pub use event::{Action, AttackType, Event, Outcome, PointId, Rotation};
pub use point::{PointRecord, RallyDirection, Side};
pub use position::PositionGroup;
pub use provenance::{InferenceConfidence, Provenance};

/// Common imports
pub mod prelude {
    pub use crate::{
        Action, AnalysisConfig, AnalysisContext, AttackType, DataQualityWarning, Error, Event,
        Outcome, PointId, PointRecord, PositionGroup, Provenance, RallyDirection, Result,
        Rotation, Side,
    };
}
