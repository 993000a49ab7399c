//! Per-set aggregate stat sheets
//!
//! Aggregate counts carry no per-event order, so events are synthesized:
//! the i-th event of a stream gets rotation `(i mod 6) + 1` unless the
//! sheet itself belongs to one rotation. Every synthesized event is tagged
//! so rotation breakdowns can tell estimates from measurements.

use crate::report::NormalizationReport;
use crate::table::{cell, Cell, RawTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use volley_core::{
    Action, AnalysisContext, DataQualityWarning, Event, Outcome, Result, Rotation,
};

/// Aggregate counts for one set, optionally for one rotation of that set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSheet {
    pub set_number: u32,
    pub rotation: Option<Rotation>,
    pub table: RawTable,
}

impl StatSheet {
    pub fn new(set_number: u32, table: RawTable) -> Self {
        Self {
            set_number,
            rotation: None,
            table,
        }
    }

    pub fn for_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

pub(crate) const REQUIRED: [&str; 1] = ["Player"];

/// Stat columns and the event stream each feeds. Columns sharing a stream
/// are summed into it.
const STAT_COLUMNS: [(&str, Action, Outcome); 22] = [
    ("Attack_Kills", Action::Attack, Outcome::Kill),
    ("Attack_Good", Action::Attack, Outcome::Defended),
    ("Attack_Blocked", Action::Attack, Outcome::Blocked),
    ("Attack_Errors", Action::Attack, Outcome::Error),
    ("Service_Aces", Action::Serve, Outcome::Ace),
    ("Service_Good", Action::Serve, Outcome::Good),
    ("Service_Errors", Action::Serve, Outcome::Error),
    ("Block_Kills", Action::Block, Outcome::Kill),
    ("Block_Touches", Action::Block, Outcome::Touch),
    ("Block_No_Kill", Action::Block, Outcome::BlockNoKill),
    ("Block_Errors", Action::Block, Outcome::Error),
    ("Reception_Perfect", Action::Receive, Outcome::Perfect),
    ("Reception_Good", Action::Receive, Outcome::Good),
    ("Good_Attack_After_Reception", Action::Receive, Outcome::Good),
    ("Reception_Errors", Action::Receive, Outcome::Error),
    ("Sets_Exceptional", Action::Set, Outcome::Exceptional),
    ("Sets_Good", Action::Set, Outcome::Good),
    ("Sets_Poor", Action::Set, Outcome::Poor),
    ("Sets_Errors", Action::Set, Outcome::Error),
    ("Dig_Perfect", Action::Dig, Outcome::Perfect),
    ("Dig_Good", Action::Dig, Outcome::Good),
    ("Dig_Errors", Action::Dig, Outcome::Error),
];

/// Total columns and the outcome given to whatever the itemized columns of
/// the same action leave over
const TOTAL_COLUMNS: [(&str, Action, Outcome); 5] = [
    ("Attack_Total", Action::Attack, Outcome::Defended),
    ("Service_Total", Action::Serve, Outcome::Good),
    ("Block_Total", Action::Block, Outcome::NoTouch),
    ("Reception_Total", Action::Receive, Outcome::Poor),
    ("Dig_Total", Action::Dig, Outcome::Poor),
];

type StreamKey = (Action, Outcome);

#[derive(Debug, Default)]
struct PlayerLine {
    position: String,
    streams: BTreeMap<StreamKey, u64>,
    totals: BTreeMap<StreamKey, u64>,
}

type LineKey = (u32, Option<Rotation>, String);

/// Sum all sheets per (set, rotation, player) and synthesize events
#[instrument(skip_all, fields(sheets = sheets.len()))]
pub fn synthesize_stat_sheets(
    ctx: &mut AnalysisContext,
    sheets: &[&StatSheet],
    report: &mut NormalizationReport,
) -> Result<Vec<Event>> {
    let mut lines: BTreeMap<LineKey, PlayerLine> = BTreeMap::new();

    for sheet in sheets {
        accumulate(ctx, sheet, &mut lines, report)?;
    }

    let mut events = Vec::new();
    for ((set_number, rotation, player), line) in &lines {
        let mut streams = line.streams.clone();
        for ((action, remainder_outcome), total) in &line.totals {
            let itemized: u64 = line
                .streams
                .iter()
                .filter(|((a, _), _)| a == action)
                .map(|(_, n)| *n)
                .sum();
            let remainder = total.saturating_sub(itemized);
            if remainder > 0 {
                *streams.entry((*action, *remainder_outcome)).or_insert(0) += remainder;
            }
        }

        for ((action, outcome), count) in &streams {
            for i in 0..*count as usize {
                let rot = rotation.unwrap_or_else(|| Rotation::round_robin(i));
                let event = Event::new(*set_number, rot, player.as_str(), *action, *outcome)?
                    .with_position(line.position.as_str())
                    .from_counts();
                events.push(event);
            }
        }
    }

    report.events_synthesized += events.len();
    debug!(players = lines.len(), events = events.len(), "stat sheets synthesized");
    Ok(events)
}

fn accumulate(
    ctx: &mut AnalysisContext,
    sheet: &StatSheet,
    lines: &mut BTreeMap<LineKey, PlayerLine>,
    report: &mut NormalizationReport,
) -> Result<()> {
    let table = &sheet.table;
    if sheet.set_number == 0 {
        ctx.warn(DataQualityWarning::MissingSet {
            table: table.name.clone(),
            row: 0,
        });
        report.tables_ignored += 1;
        return Ok(());
    }

    let player_col = table.require_strict(&REQUIRED)?[0];
    let position_col = table.column("Position");
    let stat_cols: Vec<_> = STAT_COLUMNS
        .iter()
        .filter_map(|(name, action, outcome)| {
            table.column(name).map(|idx| (idx, *name, (*action, *outcome)))
        })
        .collect();
    let total_cols: Vec<_> = TOTAL_COLUMNS
        .iter()
        .filter_map(|(name, action, outcome)| {
            table.column(name).map(|idx| (idx, *name, (*action, *outcome)))
        })
        .collect();

    for (row_no, row) in table.rows() {
        report.rows_seen += 1;

        let player = cell(row, Some(player_col)).text().unwrap_or_default();
        if ctx.config().is_template_row(&player) {
            report.rows_skipped += 1;
            continue;
        }

        let key = (sheet.set_number, sheet.rotation, player.into_owned());
        let line = lines.entry(key).or_default();
        if line.position.is_empty() {
            if let Some(position) = cell(row, position_col).text() {
                line.position = position.into_owned();
            }
        }

        for (idx, name, stream) in &stat_cols {
            let n = read_count(ctx, report, table, row_no, name, cell(row, Some(*idx)));
            *line.streams.entry(*stream).or_insert(0) += n;
        }
        for (idx, name, stream) in &total_cols {
            let n = read_count(ctx, report, table, row_no, name, cell(row, Some(*idx)));
            *line.totals.entry(*stream).or_insert(0) += n;
        }

        report.rows_accepted += 1;
    }

    Ok(())
}

/// Non-negative whole count up to `max_cell_count`; anything else is zero,
/// with a warning unless the cell is simply blank
pub(crate) fn read_count(
    ctx: &mut AnalysisContext,
    report: &mut NormalizationReport,
    table: &RawTable,
    row: usize,
    column: &str,
    value: &Cell,
) -> u64 {
    if value.is_blank() {
        report.blank_cells += 1;
        return 0;
    }
    match value.number() {
        Some(n) if n < 0.0 => {
            ctx.warn(DataQualityWarning::NegativeCount {
                table: table.name.clone(),
                row,
                column: column.to_string(),
                value: n,
            });
            0
        }
        Some(n) if n > ctx.config().max_cell_count as f64 => {
            let limit = ctx.config().max_cell_count;
            ctx.warn(DataQualityWarning::CountTooLarge {
                table: table.name.clone(),
                row,
                column: column.to_string(),
                value: n,
                limit,
            });
            0
        }
        Some(n) => n.floor() as u64,
        None => {
            ctx.warn(DataQualityWarning::UnparseableNumber {
                table: table.name.clone(),
                row,
                column: column.to_string(),
                value: value.text().unwrap_or_default().into_owned(),
            });
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::AnalysisConfig;

    fn sheet(set_number: u32, rows: Vec<Vec<Cell>>) -> StatSheet {
        let mut table = RawTable::new(
            format!("Set{set_number}"),
            ["Player", "Position", "Attack_Kills", "Attack_Errors", "Reception_Good", "Reception_Total"],
        );
        for row in rows {
            table.push_row(row);
        }
        StatSheet::new(set_number, table)
    }

    #[test]
    fn test_round_robin_rotation() {
        let s = sheet(1, vec![vec!["Alex".into(), "OH1".into(), 8.into(), 0.into(), Cell::Empty, Cell::Empty]]);
        let mut ctx = AnalysisContext::default();
        let mut report = NormalizationReport::default();

        let events = synthesize_stat_sheets(&mut ctx, &[&s], &mut report).unwrap();

        let rotations: Vec<u8> = events.iter().map(|e| e.rotation.get()).collect();
        assert_eq!(rotations, vec![1, 2, 3, 4, 5, 6, 1, 2]);
        assert!(events.iter().all(|e| e.is_synthesized() && e.from_counts && e.is_attack_kill()));
        assert_eq!(events[0].position, "OH1");
        assert_eq!(report.events_synthesized, 8);
        assert_eq!(report.blank_cells, 2);
    }

    #[test]
    fn test_sheets_are_summed_not_overwritten() {
        let a = sheet(1, vec![vec!["Alex".into(), "OH1".into(), 2.into(), 1.into(), Cell::Empty, Cell::Empty]]);
        let b = sheet(1, vec![vec!["Alex".into(), "OH1".into(), 3.into(), Cell::Empty, Cell::Empty, Cell::Empty]]);
        let mut ctx = AnalysisContext::default();

        let events =
            synthesize_stat_sheets(&mut ctx, &[&a, &b], &mut NormalizationReport::default()).unwrap();

        let kills = events.iter().filter(|e| e.outcome == Outcome::Kill).count();
        let errors = events.iter().filter(|e| e.outcome == Outcome::Error).count();
        assert_eq!((kills, errors), (5, 1));
    }

    #[test]
    fn test_fixed_rotation_sheet() {
        let s = sheet(2, vec![vec!["Alex".into(), "OH1".into(), 3.into(), 0.into(), Cell::Empty, Cell::Empty]])
            .for_rotation(Rotation::new(4).unwrap());
        let mut ctx = AnalysisContext::default();

        let events =
            synthesize_stat_sheets(&mut ctx, &[&s], &mut NormalizationReport::default()).unwrap();

        assert!(events.iter().all(|e| e.rotation.get() == 4 && e.set_number == 2));
    }

    #[test]
    fn test_total_remainder_becomes_poor() {
        let s = sheet(1, vec![vec!["Jo".into(), "L".into(), 0.into(), 0.into(), 6.into(), 10.into()]]);
        let mut ctx = AnalysisContext::default();

        let events =
            synthesize_stat_sheets(&mut ctx, &[&s], &mut NormalizationReport::default()).unwrap();

        let good = events.iter().filter(|e| e.outcome == Outcome::Good).count();
        let poor = events.iter().filter(|e| e.outcome == Outcome::Poor).count();
        assert_eq!((good, poor), (6, 4));
    }

    #[test]
    fn test_action_totals_fill_neutral_outcomes() {
        let table = RawTable::new(
            "Set1",
            ["Player", "Attack_Kills", "Attack_Errors", "Attack_Total", "Service_Aces", "Service_Total", "Block_Kills", "Block_Total"],
        )
        .with_row(vec!["Alex".into(), 3.into(), 1.into(), 10.into(), 1.into(), 5.into(), 1.into(), 4.into()]);
        let mut ctx = AnalysisContext::default();

        let events = synthesize_stat_sheets(&mut ctx, &[&StatSheet::new(1, table)], &mut NormalizationReport::default())
            .unwrap();

        let count = |action: Action, outcome: Outcome| {
            events.iter().filter(|e| e.action == action && e.outcome == outcome).count()
        };
        assert_eq!(count(Action::Attack, Outcome::Defended), 6);
        assert_eq!(count(Action::Serve, Outcome::Good), 4);
        assert_eq!(count(Action::Block, Outcome::NoTouch), 3);
        assert_eq!(events.iter().filter(|e| e.action == Action::Attack).count(), 10);
        assert!(events.iter().all(|e| e.outcome != Outcome::Poor));
    }

    #[test]
    fn test_total_below_itemized_adds_nothing() {
        let table = RawTable::new("Set1", ["Player", "Attack_Kills", "Attack_Total"])
            .with_row(vec!["Alex".into(), 5.into(), 3.into()]);
        let mut ctx = AnalysisContext::default();

        let events = synthesize_stat_sheets(&mut ctx, &[&StatSheet::new(1, table)], &mut NormalizationReport::default())
            .unwrap();

        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.is_attack_kill()));
    }

    #[test]
    fn test_oversized_count_is_skipped() {
        let s = sheet(1, vec![vec!["Alex".into(), "OH1".into(), 1e12.into(), 2.into(), Cell::Empty, Cell::Empty]]);
        let mut ctx = AnalysisContext::default();

        let events =
            synthesize_stat_sheets(&mut ctx, &[&s], &mut NormalizationReport::default()).unwrap();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.outcome == Outcome::Error));
        assert!(matches!(
            ctx.diagnostics().warnings(),
            [DataQualityWarning::CountTooLarge { column, limit: 10_000, .. }] if column == "Attack_Kills"
        ));
    }

    #[test]
    fn test_cell_limit_follows_config() {
        let config = AnalysisConfig::builder().max_cell_count(5).build().unwrap();
        let mut ctx = AnalysisContext::new(config).unwrap();
        let s = sheet(1, vec![vec!["Alex".into(), "OH1".into(), 5.into(), 6.into(), Cell::Empty, Cell::Empty]]);

        let events =
            synthesize_stat_sheets(&mut ctx, &[&s], &mut NormalizationReport::default()).unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(ctx.diagnostics().summary()["count_too_large"], 1);
    }

    #[test]
    fn test_bad_counts_are_zero_with_warning() {
        let s = sheet(1, vec![
            vec!["Alex".into(), "OH1".into(), "lots".into(), (-2).into(), Cell::Empty, Cell::Empty],
            vec!["Player_9".into(), "OH2".into(), 4.into(), 0.into(), Cell::Empty, Cell::Empty],
            vec![Cell::Empty, "OH2".into(), 4.into(), 0.into(), Cell::Empty, Cell::Empty],
        ]);
        let mut ctx = AnalysisContext::default();
        let mut report = NormalizationReport::default();

        let events = synthesize_stat_sheets(&mut ctx, &[&s], &mut report).unwrap();

        assert!(events.is_empty());
        let summary = ctx.diagnostics().summary();
        assert_eq!(summary["unparseable_number"], 1);
        assert_eq!(summary["negative_count"], 1);
        assert_eq!(report.rows_skipped, 2);
    }

    #[test]
    fn test_missing_player_column_is_fatal() {
        let s = StatSheet::new(1, RawTable::new("Set1", ["Name", "Attack_Kills"]));
        let mut ctx = AnalysisContext::default();
        assert!(synthesize_stat_sheets(&mut ctx, &[&s], &mut NormalizationReport::default()).is_err());
    }
}
