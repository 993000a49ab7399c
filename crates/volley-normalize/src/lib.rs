//! Event normalization for volleyball match analysis
//!
//! Turns the tables handed over by an external spreadsheet reader into a
//! [`MatchFeed`] of canonical [`Event`](volley_core::Event)s and explicit
//! [`PointRecord`](volley_core::PointRecord)s.
//!
//! Supported layouts:
//!
//! - **Event logs**: one row per action (`Set`, `Player`, `Action`,
//!   `Outcome`, optional `Point`, `Rotation`, `Position`, `Attack_Type`)
//! - **Team points**: one row per rally with `Point_Type` and `Point Won`
//! - **Stat sheets**: per-player aggregate counts for a set, synthesized
//!   into round-robin events
//! - **Rotation totals**: per-rotation rally counts for a set
//!
//! # Example
//!
//! ```rust
//! use volley_core::AnalysisContext;
//! use volley_normalize::{Normalizer, RawSource, RawTable};
//!
//! let log = RawTable::new("Individual Events", ["Set", "Rotation", "Player", "Action", "Outcome"])
//!     .with_row(vec![1.into(), 3.into(), "Alex".into(), "attack".into(), "kill".into()]);
//!
//! let mut ctx = AnalysisContext::default();
//! let feed = Normalizer::normalize(&mut ctx, &[RawSource::EventLog(log)])?;
//! assert_eq!(feed.events.len(), 1);
//! # Ok::<(), volley_core::Error>(())
//! ```

mod event_log;
mod normalizer;
mod report;
mod rotation_totals;
mod stat_sheet;
mod table;
mod team_points;

pub use event_log::read_event_log;
pub use normalizer::{MatchFeed, Normalizer, RawSource};
pub use report::NormalizationReport;
pub use rotation_totals::read_rotation_totals;
pub use stat_sheet::{synthesize_stat_sheets, StatSheet};
pub use table::{Cell, RawTable};
pub use team_points::read_team_points;
