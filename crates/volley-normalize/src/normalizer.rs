//! Normalization entry point

use crate::event_log::{self, read_event_log};
use crate::report::NormalizationReport;
use crate::rotation_totals::read_rotation_totals;
use crate::stat_sheet::{self, synthesize_stat_sheets, StatSheet};
use crate::table::RawTable;
use crate::team_points::read_team_points;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use volley_core::{
    AnalysisContext, DataQualityWarning, Error, Event, PointId, PointRecord, Result,
};

/// One input table, tagged with its layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawSource {
    /// One row per action
    EventLog(RawTable),
    /// One row per rally with explicit direction and winner
    TeamPoints(RawTable),
    /// Per-player aggregate counts for a set
    SetStats(StatSheet),
    /// Per-rotation rally totals for a set
    RotationTotals(StatSheet),
}

impl RawSource {
    pub fn table(&self) -> &RawTable {
        match self {
            RawSource::EventLog(t) | RawSource::TeamPoints(t) => t,
            RawSource::SetStats(s) | RawSource::RotationTotals(s) => &s.table,
        }
    }
}

/// Canonical input to the analysis stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFeed {
    pub events: Vec<Event>,
    pub points: Vec<PointRecord>,
    #[serde(skip)]
    pub report: NormalizationReport,
}

impl MatchFeed {
    /// Feed from already-canonical events and optional point records
    pub fn new(events: Vec<Event>, points: Vec<PointRecord>) -> Self {
        Self {
            events,
            points,
            report: NormalizationReport::default(),
        }
    }

    /// Events carrying no rally identifier
    pub fn events_without_point_id(&self) -> usize {
        self.events.iter().filter(|e| e.point_id.is_none()).count()
    }
}

/// Converts heterogeneous sources into one [`MatchFeed`]
pub struct Normalizer;

impl Normalizer {
    /// Normalize all sources.
    ///
    /// Structural problems (an event log or stat sheet missing required
    /// columns, or no sources at all) fail before any row is read. Every
    /// other problem is recorded on `ctx` as a warning.
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, sources = sources.len()))]
    pub fn normalize(ctx: &mut AnalysisContext, sources: &[RawSource]) -> Result<MatchFeed> {
        if sources.is_empty() {
            return Err(Error::InvalidInput("no input sources provided".to_string()));
        }
        Self::check_structure(sources)?;

        ctx.time_stage("normalize", |ctx| -> Result<MatchFeed> {
            let mut report = NormalizationReport::default();
            let mut events = Vec::new();
            let mut points = Vec::new();
            let mut stat_sheets = Vec::new();
            let mut rotation_sheets = Vec::new();

            for source in sources {
                match source {
                    RawSource::EventLog(table) => {
                        events.extend(read_event_log(ctx, table, &mut report)?);
                    }
                    RawSource::TeamPoints(table) => {
                        points.extend(read_team_points(ctx, table, &mut report));
                    }
                    RawSource::SetStats(sheet) => stat_sheets.push(sheet),
                    RawSource::RotationTotals(sheet) => rotation_sheets.push(sheet),
                }
            }

            if !rotation_sheets.is_empty() {
                points.extend(read_rotation_totals(ctx, &rotation_sheets, &mut report));
            }
            warn_duplicate_points(ctx, &points);

            if !stat_sheets.is_empty() {
                events.extend(synthesize_stat_sheets(ctx, &stat_sheets, &mut report)?);
            }

            let feed = MatchFeed {
                events,
                points,
                report,
            };
            let unidentified = feed.events_without_point_id();
            if unidentified > 0 {
                ctx.warn(DataQualityWarning::MissingPointId {
                    count: unidentified,
                });
            }

            debug!(
                events = feed.events.len(),
                points = feed.points.len(),
                skipped = feed.report.rows_skipped,
                "normalized"
            );
            Ok(feed)
        })
    }

    fn check_structure(sources: &[RawSource]) -> Result<()> {
        for source in sources {
            match source {
                RawSource::EventLog(table) => {
                    table.require_strict(&event_log::REQUIRED)?;
                }
                RawSource::SetStats(sheet) => {
                    sheet.table.require_strict(&stat_sheet::REQUIRED)?;
                }
                RawSource::TeamPoints(_) | RawSource::RotationTotals(_) => {}
            }
        }
        Ok(())
    }
}

/// Point records sharing an id; only the first reaches classification
fn warn_duplicate_points(ctx: &mut AnalysisContext, points: &[PointRecord]) {
    let mut seen: BTreeMap<&PointId, usize> = BTreeMap::new();
    for record in points {
        *seen.entry(&record.point_id).or_insert(0) += 1;
    }
    for (point_id, count) in seen {
        if count > 1 {
            ctx.warn(DataQualityWarning::DuplicatePointId {
                point_id: point_id.to_string(),
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn event_log() -> RawTable {
        RawTable::new("Individual Events", ["Set", "Point", "Rotation", "Player", "Position", "Action", "Outcome"])
            .with_row(vec![1.into(), 1.into(), 1.into(), "Alex".into(), "OH1".into(), "serve".into(), "ace".into()])
            .with_row(vec![1.into(), Cell::Empty, 1.into(), "Alex".into(), "OH1".into(), "attack".into(), "kill".into()])
    }

    #[test]
    fn test_empty_sources_fail() {
        let mut ctx = AnalysisContext::default();
        assert!(Normalizer::normalize(&mut ctx, &[]).is_err());
    }

    #[test]
    fn test_structural_failure_before_any_rows() {
        let bad = RawTable::new("Broken", ["Player"]);
        let mut ctx = AnalysisContext::default();

        let err = Normalizer::normalize(
            &mut ctx,
            &[RawSource::EventLog(event_log()), RawSource::EventLog(bad)],
        )
        .unwrap_err();

        assert!(err.is_structural());
        // nothing was read, so nothing was warned about
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_mixed_sources() {
        let team = RawTable::new("Team Events", ["Set", "Point", "Rotation", "Point_Type", "Point Won"])
            .with_row(vec![1.into(), 1.into(), 1.into(), "serving".into(), "yes".into()]);
        let stats = StatSheet::new(
            2,
            RawTable::new("Set2", ["Player", "Position", "Service_Aces"])
                .with_row(vec!["Sam".into(), "OPP".into(), 2.into()]),
        );
        let mut ctx = AnalysisContext::default();

        let feed = Normalizer::normalize(
            &mut ctx,
            &[
                RawSource::EventLog(event_log()),
                RawSource::TeamPoints(team),
                RawSource::SetStats(stats),
            ],
        )
        .unwrap();

        assert_eq!(feed.events.len(), 4);
        assert_eq!(feed.points.len(), 1);
        assert_eq!(feed.report.events_synthesized, 2);
        // one logged attack plus two synthesized serves lack a point id
        assert_eq!(ctx.diagnostics().summary()["missing_point_id"], 1);
        assert!(matches!(
            ctx.diagnostics().warnings().last(),
            Some(DataQualityWarning::MissingPointId { count: 3 })
        ));
        assert!(ctx.stage_timings().contains_key("normalize"));
    }

    #[test]
    fn test_duplicate_point_rows_are_reported() {
        let team = RawTable::new("Team Events", ["Set", "Point", "Rotation", "Point_Type", "Point Won"])
            .with_row(vec![1.into(), 4.into(), 1.into(), "serving".into(), "yes".into()])
            .with_row(vec![1.into(), 4.into(), 1.into(), "serving".into(), "no".into()])
            .with_row(vec![1.into(), 5.into(), 1.into(), "serving".into(), "no".into()]);
        let mut ctx = AnalysisContext::default();

        let feed = Normalizer::normalize(&mut ctx, &[RawSource::TeamPoints(team)]).unwrap();

        assert_eq!(feed.points.len(), 3);
        assert!(matches!(
            ctx.diagnostics().warnings(),
            [DataQualityWarning::DuplicatePointId { count: 2, .. }]
        ));
    }
}
