//! Analysis execution context
//!
//! The [`AnalysisContext`] is owned by the caller and flows through every
//! stage (normalize, classify, aggregate). It carries the configuration,
//! stage timings and the data-quality warnings collected so far. No stage
//! reads or writes process-wide state.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::event::Action;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// A recoverable data problem. The offending value is zeroed or the row
/// skipped; analysis continues.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    #[error("{table} row {row}: '{value}' in column {column} is not a number, treated as 0")]
    UnparseableNumber {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{table} row {row}: negative count {value} in column {column}, treated as 0")]
    NegativeCount {
        table: String,
        row: usize,
        column: String,
        value: f64,
    },

    #[error("{table} row {row}: count {value} in column {column} exceeds the limit of {limit}, treated as 0")]
    CountTooLarge {
        table: String,
        row: usize,
        column: String,
        value: f64,
        limit: u64,
    },

    #[error("row {row}: unknown action '{value}', row skipped")]
    UnknownAction { row: usize, value: String },

    #[error("row {row}: outcome '{outcome}' is not permitted for action '{action}', row skipped")]
    InvalidOutcome {
        row: usize,
        action: Action,
        outcome: String,
    },

    #[error("row {row}: unknown attack type '{value}', treated as normal")]
    InvalidAttackType { row: usize, value: String },

    #[error("row {row}: missing rotation in set {set_number}, carried forward as {assigned}")]
    MissingRotation {
        row: usize,
        set_number: u32,
        assigned: u8,
    },

    #[error("{table} row {row}: rotation '{value}' is not in 1..=6, ignored")]
    RotationOutOfRange {
        table: String,
        row: usize,
        value: String,
    },

    #[error("{count} events have no point id, rally rates are estimated")]
    MissingPointId { count: usize },

    #[error("point id '{point_id}' recorded {count} times, only the first record is used")]
    DuplicatePointId { point_id: String, count: usize },

    #[error("{table} row {row}: unrecognized point winner '{value}'")]
    InvalidPointWinner {
        table: String,
        row: usize,
        value: String,
    },

    #[error("{table} row {row}: unrecognized point type '{value}'")]
    InvalidPointType {
        table: String,
        row: usize,
        value: String,
    },

    #[error("{table} row {row}: missing or invalid set number, row skipped")]
    MissingSet { table: String, row: usize },

    #[error("table '{table}' ignored: {reason}")]
    IgnoredTable { table: String, reason: String },
}

impl DataQualityWarning {
    /// Short stable name of the warning kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnparseableNumber { .. } => "unparseable_number",
            Self::NegativeCount { .. } => "negative_count",
            Self::CountTooLarge { .. } => "count_too_large",
            Self::UnknownAction { .. } => "unknown_action",
            Self::InvalidOutcome { .. } => "invalid_outcome",
            Self::InvalidAttackType { .. } => "invalid_attack_type",
            Self::MissingRotation { .. } => "missing_rotation",
            Self::RotationOutOfRange { .. } => "rotation_out_of_range",
            Self::MissingPointId { .. } => "missing_point_id",
            Self::DuplicatePointId { .. } => "duplicate_point_id",
            Self::InvalidPointWinner { .. } => "invalid_point_winner",
            Self::InvalidPointType { .. } => "invalid_point_type",
            Self::MissingSet { .. } => "missing_set",
            Self::IgnoredTable { .. } => "ignored_table",
        }
    }
}

/// Warnings collected during an analysis
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    warnings: Vec<DataQualityWarning>,
}

impl Diagnostics {
    pub fn push(&mut self, warning: DataQualityWarning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warning counts keyed by kind
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for w in &self.warnings {
            *counts.entry(w.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Context that flows through the analysis stages
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// Log correlation id; never influences results
    pub trace_id: Uuid,
    pub start_time: Instant,
    config: AnalysisConfig,
    diagnostics: Diagnostics,
    stage_timings: HashMap<String, Duration>,
}

impl AnalysisContext {
    /// Create a context with a validated configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            trace_id: Uuid::new_v4(),
            start_time: Instant::now(),
            config,
            diagnostics: Diagnostics::default(),
            stage_timings: HashMap::new(),
        })
    }

    pub fn with_trace_id(mut self, trace_id: Uuid) -> Self {
        self.trace_id = trace_id;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Record a data-quality warning and emit it to the log
    pub fn warn(&mut self, warning: DataQualityWarning) {
        warn!(trace_id = %self.trace_id, kind = warning.kind(), "{warning}");
        self.diagnostics.push(warning);
    }

    pub fn record_stage_timing(&mut self, stage: impl Into<String>, duration: Duration) {
        self.stage_timings.insert(stage.into(), duration);
    }

    /// Time a stage execution
    pub fn time_stage<F, R>(&mut self, stage: impl Into<String>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let stage_name = stage.into();
        let start = Instant::now();
        let result = f(self);
        let duration = start.elapsed();
        self.record_stage_timing(stage_name, duration);
        result
    }

    pub fn stage_timings(&self) -> &HashMap<String, Duration> {
        &self.stage_timings
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            start_time: Instant::now(),
            config: AnalysisConfig::default(),
            diagnostics: Diagnostics::default(),
            stage_timings: HashMap::new(),
        }
    }
}
