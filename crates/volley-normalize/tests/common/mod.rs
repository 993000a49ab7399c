//! Shared table fixtures for integration tests
#![allow(dead_code)]

use volley_normalize::{Cell, RawTable};

pub const ROTATION_TOTAL_HEADERS: [&str; 5] = [
    "Rotation",
    "Serving_Rallies",
    "Serving_Points_Won",
    "Receiving_Rallies",
    "Receiving_Points_Won",
];

/// Seven logged contacts over four points, one with a bad outcome and one
/// missing its rotation
pub fn event_log() -> RawTable {
    let headers = [
        "Set", "Point", "Rotation", "Player", "Position", "Action", "Outcome", "Attack_Type",
    ];
    let rows: Vec<Vec<Cell>> = vec![
        vec![1.into(), 1.into(), 1.into(), "Sam".into(), "S".into(), "serve".into(), "good".into(), Cell::Empty],
        vec![1.into(), 1.into(), 1.into(), "Alex".into(), "OH1".into(), "attack".into(), "kill".into(), "tip".into()],
        vec![1.into(), 2.into(), 1.into(), "Sam".into(), "S".into(), "serve".into(), "error".into(), Cell::Empty],
        vec![1.into(), 3.into(), Cell::Empty, "Lee".into(), "L".into(), "receive".into(), "perfect".into(), Cell::Empty],
        vec![1.into(), 3.into(), 2.into(), "Alex".into(), "OH1".into(), "attack".into(), "smash".into(), Cell::Empty],
        vec![1.into(), 3.into(), 2.into(), "Alex".into(), "OH1".into(), "attack".into(), "kill".into(), Cell::Empty],
        vec![1.into(), 4.into(), 2.into(), "Player_9".into(), Cell::Empty, "serve".into(), "ace".into(), Cell::Empty],
    ];
    rows.into_iter()
        .fold(RawTable::new("Individual Events", headers), RawTable::with_row)
}

pub fn team_points() -> RawTable {
    RawTable::new("Team Events", ["Set", "Point", "Rotation", "Point_Type", "Point Won"])
        .with_row(vec![1.into(), 1.into(), 1.into(), "serving".into(), "yes".into()])
        .with_row(vec![1.into(), 2.into(), 1.into(), "serving".into(), "no".into()])
        .with_row(vec![1.into(), 3.into(), 1.into(), "receiving".into(), "Yes".into()])
}

/// Rotation totals table with one row per entry
pub fn rotation_totals(name: &str, rows: Vec<Vec<Cell>>) -> RawTable {
    rows.into_iter()
        .fold(RawTable::new(name, ROTATION_TOTAL_HEADERS), RawTable::with_row)
}
