//! Per-rally team tables with explicit direction and winner

use crate::report::NormalizationReport;
use crate::table::{cell, RawTable};
use tracing::{debug, instrument};
use volley_core::{
    AnalysisContext, DataQualityWarning, PointId, PointRecord, RallyDirection, Rotation, Side,
};

pub(crate) const REQUIRED: [&str; 4] = ["Set", "Point", "Rotation", "Point_Type"];
pub(crate) const WINNER_COLUMNS: [&str; 2] = ["Point Won", "Point_Winner"];

/// Read explicit point records.
///
/// This source is optional: a table missing columns is ignored with a
/// warning rather than failing the analysis.
#[instrument(skip_all, fields(table = %table.name, rows = table.len()))]
pub fn read_team_points(
    ctx: &mut AnalysisContext,
    table: &RawTable,
    report: &mut NormalizationReport,
) -> Vec<PointRecord> {
    let winner_col = table.column_any(&WINNER_COLUMNS);
    let required = match (table.require(&REQUIRED), winner_col) {
        (Ok(cols), Some(_)) => cols,
        (res, winner) => {
            let mut missing = res.err().unwrap_or_default();
            if winner.is_none() {
                missing.push(WINNER_COLUMNS[0].to_string());
            }
            ctx.warn(DataQualityWarning::IgnoredTable {
                table: table.name.clone(),
                reason: format!("missing columns: {}", missing.join(", ")),
            });
            report.tables_ignored += 1;
            return Vec::new();
        }
    };
    let (set_col, point_col, rotation_col, type_col) =
        (required[0], required[1], required[2], required[3]);

    let mut points = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows() {
        report.rows_seen += 1;

        let Some(set_number) = cell(row, Some(set_col)).index() else {
            ctx.warn(DataQualityWarning::MissingSet {
                table: table.name.clone(),
                row: row_no,
            });
            report.rows_skipped += 1;
            continue;
        };

        let point_cell = cell(row, Some(point_col));
        let Some(point) = point_cell.index() else {
            ctx.warn(DataQualityWarning::UnparseableNumber {
                table: table.name.clone(),
                row: row_no,
                column: "Point".to_string(),
                value: point_cell.text().unwrap_or_default().into_owned(),
            });
            report.rows_skipped += 1;
            continue;
        };

        let mut record = PointRecord::new(PointId::from_set_point(set_number, point), set_number);

        let rotation_cell = cell(row, Some(rotation_col));
        if let Some(rotation) = rotation_cell
            .index()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| Rotation::new(n).ok())
        {
            record = record.with_rotation(rotation);
        } else if !rotation_cell.is_blank() {
            ctx.warn(DataQualityWarning::RotationOutOfRange {
                table: table.name.clone(),
                row: row_no,
                value: rotation_cell.text().unwrap_or_default().into_owned(),
            });
        }

        let type_text = cell(row, Some(type_col)).text().unwrap_or_default();
        match type_text.to_ascii_lowercase().as_str() {
            "serving" | "serve" => record = record.with_direction(RallyDirection::Serving),
            "receiving" | "receive" => record = record.with_direction(RallyDirection::Receiving),
            _ => ctx.warn(DataQualityWarning::InvalidPointType {
                table: table.name.clone(),
                row: row_no,
                value: type_text.into_owned(),
            }),
        }

        let winner_text = cell(row, winner_col).text().unwrap_or_default();
        match ctx.config().parse_won(&winner_text) {
            Some(true) => record = record.with_winner(Side::Us),
            Some(false) => record = record.with_winner(Side::Opponent),
            None => ctx.warn(DataQualityWarning::InvalidPointWinner {
                table: table.name.clone(),
                row: row_no,
                value: winner_text.into_owned(),
            }),
        }

        report.rows_accepted += 1;
        report.points_recorded += 1;
        points.push(record);
    }

    debug!(points = points.len(), "team points read");
    points
}
