//! Per-action event logs

use crate::report::NormalizationReport;
use crate::table::{cell, RawTable};
use std::collections::HashMap;
use tracing::{debug, instrument};
use volley_core::{
    Action, AnalysisContext, AttackType, DataQualityWarning, Error, Event, Outcome, PointId,
    Result, Rotation,
};

pub(crate) const REQUIRED: [&str; 4] = ["Set", "Player", "Action", "Outcome"];

/// Read one event log table.
///
/// Only missing required columns fail; every row-level problem becomes a
/// warning and the row is skipped or patched.
#[instrument(skip_all, fields(table = %table.name, rows = table.len()))]
pub fn read_event_log(
    ctx: &mut AnalysisContext,
    table: &RawTable,
    report: &mut NormalizationReport,
) -> Result<Vec<Event>> {
    let required = table.require_strict(&REQUIRED)?;
    let (set_col, player_col, action_col, outcome_col) =
        (required[0], required[1], required[2], required[3]);
    let point_col = table.column("Point");
    let rotation_col = table.column("Rotation");
    let position_col = table.column("Position");
    let attack_type_col = table.column("Attack_Type");

    let mut events = Vec::with_capacity(table.len());
    let mut last_rotation: HashMap<u32, Rotation> = HashMap::new();

    for (row_no, row) in table.rows() {
        report.rows_seen += 1;

        let player = cell(row, Some(player_col)).text().unwrap_or_default();
        if ctx.config().is_template_row(&player) {
            report.rows_skipped += 1;
            continue;
        }

        let Some(set_number) = cell(row, Some(set_col)).index() else {
            ctx.warn(DataQualityWarning::MissingSet {
                table: table.name.clone(),
                row: row_no,
            });
            report.rows_skipped += 1;
            continue;
        };

        let action_text = cell(row, Some(action_col)).text().unwrap_or_default();
        let Ok(action) = action_text.parse::<Action>() else {
            ctx.warn(DataQualityWarning::UnknownAction {
                row: row_no,
                value: action_text.into_owned(),
            });
            report.rows_skipped += 1;
            continue;
        };

        let outcome_text = cell(row, Some(outcome_col)).text().unwrap_or_default();
        let Ok(outcome) = outcome_text.parse::<Outcome>() else {
            ctx.warn(DataQualityWarning::InvalidOutcome {
                row: row_no,
                action,
                outcome: outcome_text.into_owned(),
            });
            report.rows_skipped += 1;
            continue;
        };

        let (rotation, rotation_assumed) =
            match read_rotation(ctx, table, row_no, cell(row, rotation_col)) {
                Some(r) => (r, false),
                None => {
                    let assigned = last_rotation
                        .get(&set_number)
                        .copied()
                        .unwrap_or(Rotation::round_robin(0));
                    if rotation_col.is_none() || cell(row, rotation_col).is_blank() {
                        ctx.warn(DataQualityWarning::MissingRotation {
                            row: row_no,
                            set_number,
                            assigned: assigned.get(),
                        });
                    }
                    (assigned, true)
                }
            };
        last_rotation.insert(set_number, rotation);

        let mut event = match Event::new(set_number, rotation, &*player, action, outcome) {
            Ok(event) => event,
            Err(Error::InvalidOutcome { action, outcome }) => {
                ctx.warn(DataQualityWarning::InvalidOutcome {
                    row: row_no,
                    action,
                    outcome: outcome.to_string(),
                });
                report.rows_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        if let Some(position) = cell(row, position_col).text() {
            event = event.with_position(position.into_owned());
        }

        match cell(row, point_col) {
            c if c.is_blank() => {}
            c => match c.index() {
                Some(point) => event = event.with_point(PointId::from_set_point(set_number, point)),
                None => ctx.warn(DataQualityWarning::UnparseableNumber {
                    table: table.name.clone(),
                    row: row_no,
                    column: "Point".to_string(),
                    value: c.text().unwrap_or_default().into_owned(),
                }),
            },
        }

        if action == Action::Attack {
            let attack_type = match cell(row, attack_type_col).text() {
                None => AttackType::Normal,
                Some(text) => text.parse::<AttackType>().unwrap_or_else(|_| {
                    ctx.warn(DataQualityWarning::InvalidAttackType {
                        row: row_no,
                        value: text.to_string(),
                    });
                    AttackType::Normal
                }),
            };
            event = event.with_attack_type(attack_type);
        }

        if rotation_assumed {
            event = event.synthesized();
            report.rotations_assumed += 1;
        }

        report.rows_accepted += 1;
        events.push(event);
    }

    debug!(accepted = events.len(), "event log read");
    Ok(events)
}

/// Rotation from a cell; `None` (with a warning when the value is present
/// but unusable) when it must be assumed
fn read_rotation(
    ctx: &mut AnalysisContext,
    table: &RawTable,
    row_no: usize,
    c: &crate::table::Cell,
) -> Option<Rotation> {
    if c.is_blank() {
        return None;
    }
    let rotation = c
        .index()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| Rotation::new(n).ok());
    if rotation.is_none() {
        ctx.warn(DataQualityWarning::RotationOutOfRange {
            table: table.name.clone(),
            row: row_no,
            value: c.text().unwrap_or_default().into_owned(),
        });
    }
    rotation
}
