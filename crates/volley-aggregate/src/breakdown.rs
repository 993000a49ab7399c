//! Outcome distributions over a slice of events

use serde::Serialize;
use std::collections::BTreeMap;
use volley_core::{Action, AttackType, Event, Outcome};
use volley_kpi::calculator::calculate_attack_kill_pct;
use volley_kpi::{Kpi, KpiResult};

/// Outcome tallies per action, with attacks split by attack type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeBreakdown {
    pub attacks: BTreeMap<AttackType, BTreeMap<Outcome, u64>>,
    pub serves: BTreeMap<Outcome, u64>,
    pub receptions: BTreeMap<Outcome, u64>,
    pub digs: BTreeMap<Outcome, u64>,
    pub blocks: BTreeMap<Outcome, u64>,
    pub sets: BTreeMap<Outcome, u64>,
}

impl OutcomeBreakdown {
    /// Tally events; attacks without a type count as `normal`
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut breakdown = Self::default();
        for event in events {
            let tally = match event.action {
                Action::Attack => breakdown
                    .attacks
                    .entry(event.attack_type.unwrap_or_default())
                    .or_default(),
                Action::Serve => &mut breakdown.serves,
                Action::Receive => &mut breakdown.receptions,
                Action::Dig => &mut breakdown.digs,
                Action::Block => &mut breakdown.blocks,
                Action::Set => &mut breakdown.sets,
            };
            *tally.entry(event.outcome).or_insert(0) += 1;
        }
        breakdown
    }

    /// Tallies for one action, merged across attack types
    pub fn outcomes(&self, action: Action) -> BTreeMap<Outcome, u64> {
        match action {
            Action::Attack => {
                let mut merged = BTreeMap::new();
                for tally in self.attacks.values() {
                    for (outcome, count) in tally {
                        *merged.entry(*outcome).or_insert(0) += count;
                    }
                }
                merged
            }
            Action::Serve => self.serves.clone(),
            Action::Receive => self.receptions.clone(),
            Action::Dig => self.digs.clone(),
            Action::Block => self.blocks.clone(),
            Action::Set => self.sets.clone(),
        }
    }

    pub fn total(&self, action: Action) -> u64 {
        self.outcomes(action).values().sum()
    }

    /// Kill percentage for each attack type that was used
    pub fn kill_pct_by_attack_type(&self) -> BTreeMap<AttackType, KpiResult> {
        self.attacks
            .iter()
            .map(|(attack_type, tally)| {
                let attempts: u64 = tally.values().sum();
                let kills = tally.get(&Outcome::Kill).copied().unwrap_or(0);
                let result = KpiResult::new(
                    Kpi::AttackKillPct,
                    calculate_attack_kill_pct(kills, attempts),
                    kills as f64,
                    attempts,
                );
                (*attack_type, result)
            })
            .collect()
    }
}
