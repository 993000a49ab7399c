//! Shared utilities for integration tests
#![allow(dead_code)]

pub use approx::assert_relative_eq;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use volley_stats::prelude::*;

pub const EPSILON: f64 = 1e-10;

/// Roster used by generated matches: (player, position code)
pub const ROSTER: [(&str, &str); 7] = [
    ("Alex", "OH1"),
    ("Blair", "OH2"),
    ("Casey", "MB1"),
    ("Drew", "MB2"),
    ("Emery", "OPP"),
    ("Sam", "S"),
    ("Lee", "L"),
];

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn event(
    set: u32,
    rotation: u8,
    player: &str,
    position: &str,
    action: Action,
    outcome: Outcome,
) -> Event {
    Event::new(set, Rotation::new(rotation).unwrap(), player, action, outcome)
        .unwrap()
        .with_position(position)
}

/// Contacts of one rally, tagged with `S{set}-P{point}`
pub fn rally(
    set: u32,
    point: u32,
    rotation: u8,
    contacts: &[(&str, &str, Action, Outcome)],
) -> Vec<Event> {
    contacts
        .iter()
        .map(|(player, position, action, outcome)| {
            event(set, rotation, player, position, *action, *outcome)
                .with_point(PointId::from_set_point(set, point))
        })
        .collect()
}

/// A plausible match with point ids on every event; about half of the
/// points also get an explicit record.
pub fn synthetic_match(seed: u64, sets: u32, points_per_set: u32) -> MatchFeed {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut events = Vec::new();
    let mut points = Vec::new();

    for set in 1..=sets {
        let mut rotation = 1u8;
        let mut serving = rng.gen_bool(0.5);

        for point in 1..=points_per_set {
            let id = PointId::from_set_point(set, point);
            let rot = Rotation::new(rotation).unwrap();
            let mut contacts: Vec<(usize, Action, Outcome)> = Vec::new();

            let won = if serving {
                let server = rng.gen_range(0..6);
                let roll: f64 = rng.gen();
                if roll < 0.08 {
                    contacts.push((server, Action::Serve, Outcome::Ace));
                    true
                } else if roll < 0.18 {
                    contacts.push((server, Action::Serve, Outcome::Error));
                    false
                } else {
                    contacts.push((server, Action::Serve, Outcome::Good));
                    let dig = *[Outcome::Perfect, Outcome::Good, Outcome::Poor, Outcome::Error]
                        .choose(&mut rng)
                        .unwrap();
                    contacts.push((6, Action::Dig, dig));
                    dig != Outcome::Error && attack(&mut rng, &mut contacts)
                }
            } else {
                let passer = *[0usize, 1, 6].choose(&mut rng).unwrap();
                let pass = *[Outcome::Perfect, Outcome::Good, Outcome::Poor, Outcome::Error]
                    .choose(&mut rng)
                    .unwrap();
                contacts.push((passer, Action::Receive, pass));
                pass != Outcome::Error && attack(&mut rng, &mut contacts)
            };

            for (who, action, outcome) in contacts {
                let (player, position) = ROSTER[who];
                let mut event = Event::new(set, rot, player, action, outcome)
                    .unwrap()
                    .with_position(position)
                    .with_point(id.clone());
                if action == Action::Attack {
                    let kind = *AttackType::ALL.choose(&mut rng).unwrap();
                    event = event.with_attack_type(kind);
                }
                events.push(event);
            }

            if rng.gen_bool(0.5) {
                let direction = if serving {
                    RallyDirection::Serving
                } else {
                    RallyDirection::Receiving
                };
                let winner = if won { Side::Us } else { Side::Opponent };
                points.push(
                    PointRecord::new(id, set)
                        .with_rotation(rot)
                        .with_direction(direction)
                        .with_winner(winner),
                );
            }

            if won && !serving {
                rotation = rotation % 6 + 1;
            }
            serving = won;
        }
    }

    MatchFeed::new(events, points)
}

/// Set and attack; returns whether the attack was a kill
fn attack(rng: &mut ChaCha8Rng, contacts: &mut Vec<(usize, Action, Outcome)>) -> bool {
    contacts.push((5, Action::Set, Outcome::Good));
    let hitter = rng.gen_range(0..5);
    let outcome = *[
        Outcome::Kill,
        Outcome::Kill,
        Outcome::Defended,
        Outcome::Blocked,
        Outcome::Out,
        Outcome::Net,
    ]
    .choose(rng)
    .unwrap();
    contacts.push((hitter, Action::Attack, outcome));
    outcome == Outcome::Kill
}
