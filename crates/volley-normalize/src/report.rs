//! Row accounting for a normalization run

use serde::Serialize;

/// Counts of what happened to the input rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub rows_seen: usize,
    pub rows_accepted: usize,
    pub rows_skipped: usize,
    /// Events whose rotation was carried forward rather than recorded
    pub rotations_assumed: usize,
    /// Events generated from aggregate counts
    pub events_synthesized: usize,
    pub points_recorded: usize,
    /// Blank stat cells read as zero
    pub blank_cells: usize,
    pub tables_ignored: usize,
}
