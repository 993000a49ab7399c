//! Per-rotation team rally totals
//!
//! Each row holds the rally counts for one rotation of a set. Rows and
//! sheets naming the same (set, rotation) are summed, then the counts are
//! rebuilt into explicit [`PointRecord`]s tagged `Synthesized`: the totals
//! are measured but the rally order is not.

use crate::report::NormalizationReport;
use crate::stat_sheet::{read_count, StatSheet};
use crate::table::{cell, Cell};
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use volley_core::{
    AnalysisContext, DataQualityWarning, PointId, PointRecord, RallyDirection, Rotation, Side,
};

const TOTAL_COLUMNS: [&str; 4] = [
    "Serving_Rallies",
    "Serving_Points_Won",
    "Receiving_Rallies",
    "Receiving_Points_Won",
];

/// Rallies and rallies won, per direction
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    serving: u64,
    serving_won: u64,
    receiving: u64,
    receiving_won: u64,
}

/// Sum all sheets per (set, rotation) and rebuild the rallies once
#[instrument(skip_all, fields(sheets = sheets.len()))]
pub fn read_rotation_totals(
    ctx: &mut AnalysisContext,
    sheets: &[&StatSheet],
    report: &mut NormalizationReport,
) -> Vec<PointRecord> {
    let mut tallies: BTreeMap<(u32, Rotation), Tally> = BTreeMap::new();
    for sheet in sheets {
        accumulate(ctx, sheet, &mut tallies, report);
    }

    let mut points = Vec::new();
    for ((set, rotation), tally) in &tallies {
        let r = rotation.get();
        for (direction, rallies, won, tag) in [
            (RallyDirection::Serving, tally.serving, tally.serving_won, 'S'),
            (RallyDirection::Receiving, tally.receiving, tally.receiving_won, 'R'),
        ] {
            for n in 0..rallies {
                let winner = if n < won { Side::Us } else { Side::Opponent };
                points.push(
                    PointRecord::new(PointId::new(format!("S{set}-R{r}-{tag}{}", n + 1)), *set)
                        .with_rotation(*rotation)
                        .with_direction(direction)
                        .with_winner(winner)
                        .synthesized(),
                );
            }
        }
    }

    report.points_recorded += points.len();
    debug!(runs = tallies.len(), points = points.len(), "rotation totals rebuilt");
    points
}

#[instrument(skip_all, fields(table = %sheet.table.name, set = sheet.set_number))]
fn accumulate(
    ctx: &mut AnalysisContext,
    sheet: &StatSheet,
    tallies: &mut BTreeMap<(u32, Rotation), Tally>,
    report: &mut NormalizationReport,
) {
    let table = &sheet.table;
    let cols = match table.require(&TOTAL_COLUMNS) {
        Ok(cols) => cols,
        Err(missing) => {
            ctx.warn(DataQualityWarning::IgnoredTable {
                table: table.name.clone(),
                reason: format!("missing columns: {}", missing.join(", ")),
            });
            report.tables_ignored += 1;
            return;
        }
    };
    if sheet.set_number == 0 {
        ctx.warn(DataQualityWarning::MissingSet {
            table: table.name.clone(),
            row: 0,
        });
        report.tables_ignored += 1;
        return;
    }
    let rotation_col = table.column("Rotation");

    for (row_no, row) in table.rows() {
        report.rows_seen += 1;

        let rotation = sheet
            .rotation
            .or_else(|| parse_rotation(cell(row, rotation_col)))
            .unwrap_or_else(|| Rotation::round_robin(row_no - 1));

        let mut counts = [0u64; 4];
        for (slot, (idx, name)) in counts.iter_mut().zip(cols.iter().zip(TOTAL_COLUMNS)) {
            *slot = read_count(ctx, report, table, row_no, name, cell(row, Some(*idx)));
        }
        let [serving, serving_won, receiving, receiving_won] = counts;

        let tally = tallies.entry((sheet.set_number, rotation)).or_default();
        tally.serving += serving;
        tally.serving_won += serving_won.min(serving);
        tally.receiving += receiving;
        tally.receiving_won += receiving_won.min(receiving);

        report.rows_accepted += 1;
    }
}

/// `3`, `3.0`, `"Rotation 3"` or `"Rotation 3 (Setter Front)"`
fn parse_rotation(value: &Cell) -> Option<Rotation> {
    let n = value.index().or_else(|| {
        let text = value.text()?;
        let lower = text.to_ascii_lowercase();
        let rest = lower.strip_prefix("rotation")?.trim_start();
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    })?;
    u8::try_from(n).ok().and_then(|n| Rotation::new(n).ok())
}
