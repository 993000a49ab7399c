//! KPI calculation for volleyball matches
//!
//! - [`calculator`]: pure `calculate_*` ratio functions over raw counts
//! - [`Kpi`] / [`KpiDefinition`]: the catalogue with target bands and
//!   benchmarks
//! - [`KpiResult`]: a computed value with its counts, targets and
//!   provenance
//!
//! # Example
//!
//! ```rust
//! use volley_kpi::{calculator::calculate_attack_kill_pct, Grade, Kpi, KpiResult};
//!
//! let value = calculate_attack_kill_pct(4, 10);
//! let result = KpiResult::new(Kpi::AttackKillPct, value, 4.0, 10);
//! assert_eq!(result.grade(), Grade::Fair);
//! ```

pub mod calculator;
mod definitions;
mod result;

pub use definitions::{Category, Grade, Kpi, KpiDefinition, TargetBand};
pub use result::KpiResult;
