//! Raw tables through the normalizer

mod common;

use common::*;
use std::collections::HashSet;
use volley_core::{
    Action, AnalysisConfig, AnalysisContext, AttackType, DataQualityWarning, Error, Outcome,
    RallyDirection,
};
use volley_normalize::{Cell, Normalizer, RawSource, RawTable, StatSheet};

#[test]
fn test_event_log_with_team_points() {
    let mut ctx = AnalysisContext::default();
    let sources = [RawSource::EventLog(event_log()), RawSource::TeamPoints(team_points())];

    let feed = Normalizer::normalize(&mut ctx, &sources).unwrap();

    assert_eq!(feed.report.rows_seen, 7 + 3);
    assert_eq!(feed.events.len(), 5);
    assert_eq!(feed.points.len(), 3);
    assert_eq!(feed.report.rotations_assumed, 1);
    assert_eq!(feed.events_without_point_id(), 0);

    let tip = feed.events.iter().find(|e| e.attack_type == Some(AttackType::Tip));
    assert!(tip.is_some_and(|e| e.player == "Alex"));

    let warnings = ctx.diagnostics().summary();
    assert_eq!(warnings.get("missing_rotation"), Some(&1));
    assert_eq!(warnings.get("invalid_outcome"), Some(&1));
    assert!(ctx.stage_timings().contains_key("normalize"));

    let warnings_json = serde_json::to_value(ctx.diagnostics().warnings()).unwrap();
    assert!(warnings_json
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w["kind"] == "invalid_outcome"));
}

#[test]
fn test_missing_required_columns_is_fatal() {
    let broken = RawTable::new("Individual Events", ["Set", "Player", "Action"])
        .with_row(vec![1.into(), "Alex".into(), "attack".into()]);
    let mut ctx = AnalysisContext::default();

    let err = Normalizer::normalize(&mut ctx, &[RawSource::EventLog(broken)]).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, Error::MissingColumns { ref columns, .. } if columns == &["Outcome".to_string()]));
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_optional_table_with_missing_columns_is_ignored() {
    let partial = RawTable::new("Team Events", ["Set", "Point"]);
    let mut ctx = AnalysisContext::default();
    let sources = [RawSource::EventLog(event_log()), RawSource::TeamPoints(partial)];

    let feed = Normalizer::normalize(&mut ctx, &sources).unwrap();
    assert!(feed.points.is_empty());
    assert_eq!(feed.report.tables_ignored, 1);
    assert_eq!(ctx.diagnostics().summary().get("ignored_table"), Some(&1));
}

#[test]
fn test_stat_sheet_totals_become_neutral_outcomes() {
    let table = RawTable::new(
        "Set2-Stats",
        ["Player", "Position", "Attack_Kills", "Attack_Errors", "Attack_Total", "Service_Aces", "Service_Errors", "Service_Total"],
    )
    .with_row(vec!["Alex".into(), "OH1".into(), 4.into(), 1.into(), 10.into(), 1.into(), 1.into(), 6.into()]);
    let mut ctx = AnalysisContext::default();

    let feed = Normalizer::normalize(&mut ctx, &[RawSource::SetStats(StatSheet::new(2, table))]).unwrap();

    let count = |action: Action, outcome: Outcome| {
        feed.events
            .iter()
            .filter(|e| e.action == action && e.outcome == outcome)
            .count()
    };
    assert_eq!(count(Action::Attack, Outcome::Defended), 5);
    assert_eq!(count(Action::Serve, Outcome::Good), 4);
    assert_eq!(feed.report.events_synthesized, 16);
    assert!(feed.events.iter().all(|e| e.from_counts && e.set_number == 2));
}

#[test]
fn test_repeated_rotation_totals_are_summed() {
    let row = || vec!["Rotation 2".into(), 3.into(), 1.into(), 0.into(), 0.into()];
    let first = StatSheet::new(1, rotation_totals("Set1-Team Points", vec![row()]));
    let second = StatSheet::new(1, rotation_totals("Set1-Team Points", vec![row()]));
    let mut ctx = AnalysisContext::default();

    let feed = Normalizer::normalize(
        &mut ctx,
        &[RawSource::RotationTotals(first), RawSource::RotationTotals(second)],
    )
    .unwrap();

    assert_eq!(feed.points.len(), 6);
    let ids: HashSet<_> = feed.points.iter().map(|p| &p.point_id).collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(feed.points.iter().filter(|p| p.won() == Some(true)).count(), 2);
    assert!(ctx.diagnostics().summary().get("duplicate_point_id").is_none());
}

#[test]
fn test_rotation_less_rows_wrap_without_loss() {
    let rows = (0..7)
        .map(|_| vec![Cell::Empty, 2.into(), 0.into(), 0.into(), 0.into()])
        .collect();
    let mut ctx = AnalysisContext::default();

    let feed = Normalizer::normalize(
        &mut ctx,
        &[RawSource::RotationTotals(StatSheet::new(1, rotation_totals("Set1", rows)))],
    )
    .unwrap();

    assert_eq!(feed.points.len(), 14);
    assert!(feed
        .points
        .iter()
        .all(|p| p.direction == Some(RallyDirection::Serving)));
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_oversized_counts_are_warned_and_skipped() {
    let stats = RawTable::new("Set1-Stats", ["Player", "Attack_Kills", "Dig_Total"])
        .with_row(vec!["Alex".into(), 1e12.into(), 3.into()]);
    let totals = rotation_totals("Set1-Team Points", vec![vec![1.into(), 1e12.into(), 0.into(), 1.into(), 1.into()]]);
    let mut ctx = AnalysisContext::default();

    let feed = Normalizer::normalize(
        &mut ctx,
        &[
            RawSource::SetStats(StatSheet::new(1, stats)),
            RawSource::RotationTotals(StatSheet::new(1, totals)),
        ],
    )
    .unwrap();

    assert_eq!(feed.events.len(), 3);
    assert!(feed.events.iter().all(|e| e.action == Action::Dig));
    assert_eq!(feed.points.len(), 1);
    let oversized: Vec<_> = ctx
        .diagnostics()
        .warnings()
        .iter()
        .filter(|w| matches!(w, DataQualityWarning::CountTooLarge { .. }))
        .collect();
    assert_eq!(oversized.len(), 2);
}

#[test]
fn test_cell_limit_is_configurable() {
    let stats = RawTable::new("Set1-Stats", ["Player", "Service_Aces"])
        .with_row(vec!["Sam".into(), 40.into()]);
    let config = AnalysisConfig::builder().max_cell_count(25).build().unwrap();
    let mut ctx = AnalysisContext::new(config).unwrap();

    let feed = Normalizer::normalize(&mut ctx, &[RawSource::SetStats(StatSheet::new(1, stats))]).unwrap();

    assert!(feed.events.is_empty());
    assert_eq!(ctx.diagnostics().summary()["count_too_large"], 1);
}
