//! Property-based tests over generated events and counts

mod common;

use common::*;
use proptest::prelude::*;
use volley_stats::prelude::*;
use volley_stats::volley_kpi::calculator::*;

const PLAYERS: [(&str, &str); 5] = [
    ("Alex", "OH1"),
    ("Blair", "OH2"),
    ("Casey", "MB1"),
    ("Sam", "S"),
    ("Lee", "L"),
];

/// Any valid event; point ids on roughly half of them
fn arb_event() -> impl Strategy<Value = Event> {
    (
        0usize..PLAYERS.len(),
        0usize..Action::ALL.len(),
        0usize..6,
        1u8..=6,
        1u32..=3,
        prop::option::of(1u32..40),
    )
        .prop_map(|(who, action, outcome, rotation, set, point)| {
            let (player, position) = PLAYERS[who];
            let action = Action::ALL[action];
            let permitted = action.permitted_outcomes();
            let outcome = permitted[outcome % permitted.len()];
            let event = event(set, rotation, player, position, action, outcome);
            match point {
                Some(p) => event.with_point(PointId::from_set_point(set, p)),
                None => event,
            }
        })
}

proptest! {
    #[test]
    fn prop_interval_contains_observed_rate(total in 1u64..500, frac in 0.0f64..=1.0) {
        let successes = (frac * total as f64).floor();
        for level in [ConfidenceLevel::NINETY, ConfidenceLevel::NINETY_FIVE, ConfidenceLevel::NINETY_NINE] {
            let ci = proportion_ci(successes, total, level);
            let p = successes / total as f64;
            prop_assert!(ci.lower <= p + 1e-12 && p <= ci.upper + 1e-12);
            prop_assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
        }
    }

    #[test]
    fn prop_zero_totals_yield_zero(count in 0u64..1000) {
        prop_assert_eq!(calculate_side_out_efficiency(count, 0), 0.0);
        prop_assert_eq!(calculate_break_point_rate(count, 0), 0.0);
        prop_assert_eq!(calculate_attack_kill_pct(count, 0), 0.0);
        prop_assert_eq!(calculate_reception_quality(count as f64, 0), 0.0);
        prop_assert_eq!(calculate_dig_rate(count as f64, 0), 0.0);
        prop_assert_eq!(calculate_block_kill_pct(count, 0), 0.0);
        prop_assert_eq!(calculate_serve_in_rate(count, count, 0), 0.0);
        prop_assert_eq!(calculate_ace_rate(count, 0), 0.0);
        prop_assert_eq!(calculate_serve_error_rate(count, 0), 0.0);
        prop_assert_eq!(calculate_attack_efficiency(count, 0, 0, 0), 0.0);
        prop_assert_eq!(calculate_set_conversion(count, 0), 0.0);
        prop_assert_eq!(calculate_ace_to_error_ratio(count, 0), 0.0);
        prop_assert_eq!(calculate_block_touch_rate(count, count, count, 0), 0.0);
    }

    #[test]
    fn prop_aggregation_is_idempotent(events in prop::collection::vec(arb_event(), 0..80)) {
        let ctx = AnalysisContext::default();
        let first = MatchAnalysis::new(&ctx, MatchFeed::new(events.clone(), Vec::new())).unwrap();
        let second = MatchAnalysis::new(&ctx, MatchFeed::new(events, Vec::new())).unwrap();

        for dimension in Dimension::ALL {
            prop_assert_eq!(first.buckets(dimension), first.buckets(dimension));
            prop_assert_eq!(first.buckets(dimension), second.buckets(dimension));
        }
        prop_assert_eq!(first.all_breakdowns(), second.all_breakdowns());
    }

    #[test]
    fn prop_player_buckets_partition_team(events in prop::collection::vec(arb_event(), 0..80)) {
        let analysis = MatchAnalysis::new(&AnalysisContext::default(), MatchFeed::new(events, Vec::new())).unwrap();
        let team = analysis.team_summary().totals;
        let players = analysis.buckets(Dimension::Player);

        let kills: u64 = players.values().map(|b| b.attack_kills).sum();
        let attempts: u64 = players.values().map(|b| b.attack_attempts).sum();
        let events: u64 = players.values().map(|b| b.events).sum();
        prop_assert_eq!(kills, team.attack_kills);
        prop_assert_eq!(attempts, team.attack_attempts);
        prop_assert_eq!(events, team.events);

        let sets: u64 = analysis.buckets(Dimension::Set).values().map(|b| b.attack_kills).sum();
        prop_assert_eq!(sets, team.attack_kills);
    }

    #[test]
    fn prop_set_rallies_partition_team(events in prop::collection::vec(arb_event(), 0..80)) {
        let analysis = MatchAnalysis::new(&AnalysisContext::default(), MatchFeed::new(events, Vec::new())).unwrap();
        let team = analysis.team_summary().totals;
        let sets = analysis.buckets(Dimension::Set);

        let serving: u64 = sets.values().map(|b| b.serving_rallies).sum();
        let receiving: u64 = sets.values().map(|b| b.receiving_rallies).sum();
        let won: u64 = sets.values().map(|b| b.serving_points_won + b.receiving_points_won).sum();
        prop_assert_eq!(serving, team.serving_rallies);
        prop_assert_eq!(receiving, team.receiving_rallies);
        prop_assert_eq!(won, team.serving_points_won + team.receiving_points_won);
    }

    #[test]
    fn prop_equal_rates_never_significant(n in 1u64..200, frac in 0.0f64..=1.0, alpha in 0.001f64..0.999) {
        let successes = (frac * n as f64).floor();
        let a = KpiResult::new(Kpi::AttackKillPct, successes / n as f64, successes, n);
        prop_assert!(compare(&a, &a, alpha).unwrap().is_none());
    }

    #[test]
    fn prop_rally_counters_bounded(seed in 0u64..64) {
        let feed = synthetic_match(seed, 3, 25);
        let analysis = MatchAnalysis::new(&AnalysisContext::default(), feed).unwrap();
        let counters = analysis.classification().counters;
        prop_assert!(counters.serving_points_won <= counters.serving_rallies);
        prop_assert!(counters.receiving_points_won <= counters.receiving_rallies);
        prop_assert_eq!(
            counters.rallies() as usize + analysis.classification().skipped.len(),
            75
        );
    }
}
